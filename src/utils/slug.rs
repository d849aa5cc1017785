//! 文章 slug 生成

/// slug 最大字符数
pub const MAX_SLUG_CHARS: usize = 80;

/// 由标题生成 slug
///
/// 小写化，保留 Unicode 字母数字（日文标题可以原样保留），
/// 其余字符连续出现时折叠为一个 `-`，去掉首尾 `-`，最多 80 个字符。
/// 结果为空时返回 `None`。
pub fn slugify(title: &str) -> Option<String> {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    let mut chars = 0usize;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                if chars + 1 >= MAX_SLUG_CHARS {
                    break;
                }
                slug.push('-');
                chars += 1;
            }
            pending_dash = false;
            if chars >= MAX_SLUG_CHARS {
                break;
            }
            slug.push(c);
            chars += 1;
        } else {
            pending_dash = true;
        }
    }

    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 第 n 个候选 slug：`base`, `base-2`, `base-3`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// slug 为空时的回退值：id 的前 8 个字符
pub fn fallback_from_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ascii_title() {
        assert_eq!(
            slugify("Hello, World! Rust 2024").as_deref(),
            Some("hello-world-rust-2024")
        );
    }

    #[test]
    fn test_collapses_and_trims_separators() {
        assert_eq!(slugify("  --Hello___World--  ").as_deref(), Some("hello-world"));
    }

    #[test]
    fn test_keeps_unicode_letters() {
        assert_eq!(
            slugify("東京の 夜・散歩").as_deref(),
            Some("東京の-夜-散歩")
        );
        assert_eq!(slugify("Ünïcödé Straße").as_deref(), Some("ünïcödé-straße"));
    }

    #[test]
    fn test_symbols_only_is_none() {
        assert_eq!(slugify("!!! ??? ..."), None);
        assert_eq!(slugify(""), None);
    }

    #[test]
    fn test_length_is_capped_without_trailing_dash() {
        let title = "word ".repeat(40);
        let slug = slugify(&title).unwrap();
        assert!(slug.chars().count() <= MAX_SLUG_CHARS);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn test_candidates_and_fallback() {
        assert_eq!(candidate("post", 1), "post");
        assert_eq!(candidate("post", 2), "post-2");
        assert_eq!(candidate("post", 7), "post-7");
        assert_eq!(
            fallback_from_id("3f2b8c1e-aaaa-4bbb-8ccc-000000000000"),
            "3f2b8c1e"
        );
    }
}
