pub mod ip;
pub mod markdown;
pub mod slug;

use base64::Engine;
use rand::RngExt;

/// 生成 URL 安全的随机 token（`bytes` 字节熵，Base64 无填充编码）
pub fn generate_secure_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill(&mut buf[..]);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// 上传文件的存储名：`<unix 毫秒>-<原文件名>`
///
/// 空白替换为 `_`，路径分隔符和控制字符去掉；没有文件名时使用 `untitled`。
pub fn upload_filename(original: Option<&str>, now_millis: i64) -> String {
    let base = original
        .map(|name| {
            // 只取最后一段，防止 "../../etc/passwd" 一类的名字
            let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
            let mut cleaned = String::with_capacity(last.len());
            let mut in_space = false;
            for c in last.chars() {
                if c.is_whitespace() {
                    if !in_space {
                        cleaned.push('_');
                    }
                    in_space = true;
                    continue;
                }
                in_space = false;
                if c.is_control() {
                    continue;
                }
                cleaned.push(c);
            }
            cleaned.trim_start_matches('.').to_string()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string());

    format!("{}-{}", now_millis, base)
}
