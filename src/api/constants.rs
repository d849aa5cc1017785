//! API 模块常量定义
//!
//! 包含认证、Cookie 等相关的硬编码常量。

/// 会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "inkpost_session";

/// OAuth state Cookie 名称
pub const OAUTH_STATE_COOKIE_NAME: &str = "inkpost_oauth_state";

/// OAuth state 有效期（分钟）
pub const OAUTH_STATE_MINUTES: i64 = 10;

/// JSON 请求体上限
pub const JSON_PAYLOAD_LIMIT: usize = 1024 * 1024;
