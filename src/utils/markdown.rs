//! Markdown → 纯文本
//!
//! 只用于生成摘要和搜索匹配：按顺序执行一组正则替换，把常见语法标记去掉。
//! 渲染由浏览器端负责。

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// 默认摘要长度（字符数）
pub const DEFAULT_EXCERPT_CHARS: usize = 160;

/// 可以用反斜杠转义的字符；转义后在替换期间映射到私有区字符
const ESCAPABLE: &str = "\\`*_{}[]()#+-.!~|<>";
const ESCAPE_BASE: u32 = 0xE000;

static ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\\([\\`*_{}\[\]()#+\-.!~|<>])"));

/// 下划线强调：只去掉贴着非字母数字一侧的 `_`，snake_case 保留
static UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(^|[^\p{L}\p{N}])_+|_+([^\p{L}\p{N}]|$)"));

/// 按顺序执行的替换规则
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // 围栏代码块整体丢弃
        (r"(?ms)^[ \t]*```.*?^[ \t]*```[^\n]*$", ""),
        (r"(?ms)^[ \t]*~~~.*?^[ \t]*~~~[^\n]*$", ""),
        // 表格分隔行
        (r"(?m)^[ \t]*\|?(?:[ \t]*:?-+:?[ \t]*\|)+(?:[ \t]*:?-+:?[ \t]*)?$", ""),
        // 分隔线、setext 下划线
        (r"(?m)^[ \t]*(?:[-*_=][ \t]*){3,}$", ""),
        // 图片
        (r"!\[[^\]]*\]\((?:[^()]|\([^()]*\))*\)", ""),
        // 链接只保留文字，URL 允许一层括号
        (r"\[([^\]]*)\]\((?:[^()]|\([^()]*\))*\)", "$1"),
        (r"\[([^\]]*)\]\[[^\]]*\]", "$1"),
        // 引用式链接定义
        (r"(?m)^[ \t]*\[[^\]]+\]:[ \t]+\S.*$", ""),
        // 行内代码
        (r"`+([^`\n]+?)`+", "$1"),
        // HTML 标签
        (r"<[^>\n]+>", " "),
        // 标题、引用、列表（含任务列表）标记
        (r"(?m)^[ \t]*#{1,6}[ \t]+", ""),
        (r"(?m)^[ \t]*(?:>[ \t]?)+", ""),
        (r"(?m)^[ \t]*(?:[-*+]|\d+[.)])[ \t]+(?:\[[ xX]\][ \t]+)?", ""),
        // 强调、删除线
        (r"\*+", ""),
        (r"~~", ""),
        // 表格竖线
        (r"\|", " "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (compile(pattern), replacement))
    .collect()
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in markdown pattern")
}

/// 去除 Markdown 语法，返回单行纯文本
pub fn strip_markdown(md: &str) -> String {
    let normalized = md.replace("\r\n", "\n");
    let mut text = ESCAPE
        .replace_all(&normalized, |caps: &Captures| hide_escaped(&caps[1]))
        .into_owned();

    for (re, replacement) in RULES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text = UNDERSCORE.replace_all(&text, "$1$2").into_owned();

    reveal_escaped(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 纯文本的前 `max_chars` 个字符，被截断时追加 `...`
pub fn excerpt(md: &str, max_chars: usize) -> String {
    let plain = strip_markdown(md);
    if plain.chars().count() <= max_chars {
        return plain;
    }
    let cut: String = plain.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

fn hide_escaped(escaped: &str) -> String {
    escaped
        .chars()
        .filter_map(|c| ESCAPABLE.chars().position(|e| e == c))
        .filter_map(|idx| char::from_u32(ESCAPE_BASE + idx as u32))
        .collect()
}

fn reveal_escaped(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            code.checked_sub(ESCAPE_BASE)
                .and_then(|idx| ESCAPABLE.chars().nth(idx as usize))
                .unwrap_or(c)
        })
        .collect()
}
