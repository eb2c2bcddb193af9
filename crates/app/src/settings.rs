//! # 配置加载
//!
//! 优先级从低到高：`AppConfig::default()`、TOML 文件、`ALGO__` 前缀环境变量。

use algo_core::config::AppConfig;
use config::{Config, Environment, File};

/// 未设置 `ALGO_CONFIG` 时读取的配置文件
pub const DEFAULT_CONFIG_PATH: &str = "config/algo.toml";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "ALGO_CONFIG";

/// # Summary
/// 按进程环境加载配置。
///
/// # Logic
/// 1. 文件路径取 `ALGO_CONFIG`，缺省为 `config/algo.toml`，文件不存在时跳过。
/// 2. `ALGO__HTTP__PORT=9000` 形式的环境变量覆盖对应字段。
pub fn load() -> Result<AppConfig, config::ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_with(&path, env_source())
}

/// 以给定的文件与环境变量源加载配置
///
/// `app_name` 会成为路由前缀，必须非空且不含 `/`。
pub fn load_with(path: &str, env: Environment) -> Result<AppConfig, config::ConfigError> {
    let config: AppConfig = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()?;

    if config.app_name.trim().is_empty() || config.app_name.contains('/') {
        return Err(config::ConfigError::Message(format!(
            "app_name must be a non-empty path segment without '/', got {:?}",
            config.app_name
        )));
    }
    Ok(config)
}

/// `ALGO__SECTION__KEY` 形式的环境变量源
pub fn env_source() -> Environment {
    Environment::with_prefix("ALGO")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
