//! 数据库操作重试
//!
//! 连接池获取失败、死锁、SQLite BUSY 这类瞬时错误按指数退避重试，
//! 其余错误直接返回。

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 可重试的数据库错误码
/// MySQL 死锁/锁超时，PostgreSQL 序列化失败/死锁，SQLite BUSY/LOCKED
const RETRYABLE_DB_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

/// 错误消息回退匹配
const RETRYABLE_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "serialization failure",
];

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_runtime_error(runtime_err)
        }
        _ => false,
    }
}

fn is_retryable_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(code) = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code())
            {
                return RETRYABLE_DB_CODES.contains(&code.as_ref());
            }
            message_is_retryable(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => message_is_retryable(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn message_is_retryable(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    RETRYABLE_MESSAGES.iter().any(|m| lower.contains(m))
}

/// 重试配置
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(db: &DatabaseConfig) -> Self {
        Self {
            max_retries: db.retry_count,
            base_delay_ms: db.retry_base_delay_ms,
            max_delay_ms: db.retry_max_delay_ms,
        }
    }
}

/// 指数退避重试执行器
///
/// 只对 [`is_retryable_error`] 认定的错误重试，延迟带 0-25% 随机抖动。
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "Operation '{}' succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(result);
            }
            Err(e) if is_retryable_error(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "Operation '{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    use rand::RngExt;
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    let jitter = rand::rng().random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_connection_errors_are_retryable() {
        let err = DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout);
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_locked_database_is_retryable() {
        let err = DbErr::Exec(sea_orm::error::RuntimeErr::Internal(
            "database is locked".to_string(),
        ));
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_record_not_found_is_not_retryable() {
        let err = DbErr::RecordNotFound("article".to_string());
        assert!(!is_retryable_error(&err));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let first = calculate_backoff(1, 100, 2000);
        assert!((100..=125).contains(&first));

        let third = calculate_backoff(3, 100, 2000);
        assert!((400..=500).contains(&third));

        let capped = calculate_backoff(12, 100, 2000);
        assert!((2000..=2500).contains(&capped));
    }

    #[tokio::test]
    async fn test_with_retry_recovers_from_transient_error() {
        let calls = AtomicU32::new(0);

        let result = with_retry("like", fast_config(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::ConnectionAcquire(
                        sea_orm::error::ConnAcquireErr::Timeout,
                    ))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_after_limit() {
        let calls = AtomicU32::new(0);

        let result = with_retry("get", fast_config(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<(), _>(DbErr::ConnectionAcquire(
                    sea_orm::error::ConnAcquireErr::Timeout,
                ))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_does_not_retry_permanent_error() {
        let calls = AtomicU32::new(0);

        let result = with_retry("get", fast_config(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::Custom("constraint".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
