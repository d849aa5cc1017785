use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration from "config.toml" in the current directory.
///
/// # Examples
/// ```no_run
/// use inkpost::config::init_config;
/// init_config();
/// ```
pub fn init_config() {
    init_config_from(None);
}

/// Initialize the global configuration from an explicit path (`-c/--config`)
///
/// Subsequent calls are no-ops.
pub fn init_config_from(path: Option<&str>) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load_from(path)));
}

/// 替换全局配置（测试与 CLI 覆盖使用）
pub fn update_config(config: StaticConfig) {
    let config = Arc::new(config);
    match CONFIG.get() {
        Some(current) => current.store(config),
        None => {
            let swap = CONFIG.get_or_init(|| ArcSwap::new(config.clone()));
            swap.store(config);
        }
    }
}
