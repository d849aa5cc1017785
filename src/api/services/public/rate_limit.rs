//! 公开端点的限流
//!
//! 按客户端 IP 计数。IP 解析规则见 [`crate::utils::ip::client_ip`]。

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use governor::middleware::NoOpMiddleware;
use tracing::debug;

use crate::config::get_config;
use crate::utils::ip::client_ip;

/// 基于客户端 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let config = get_config();
        client_ip(
            &req.connection_info(),
            req.headers(),
            &config.server.trusted_proxies,
        )
        .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract client IP"))
    }
}

/// 点赞限流：每秒补充 1 个令牌，突发 10 次
pub fn like_rate_limiter() -> Governor<ClientIpKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(10)
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Like rate limiter created: 1 req/s, burst 10");
    Governor::new(&config)
}

/// 翻译限流：每 2 秒补充 1 个令牌，突发 20 次（一篇文章会批量翻译多段）
pub fn translate_rate_limiter() -> Governor<ClientIpKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(2)
        .burst_size(20)
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Translate rate limiter created: 0.5 req/s, burst 20");
    Governor::new(&config)
}
