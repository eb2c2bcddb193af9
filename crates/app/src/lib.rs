//! # 进程装配
//!
//! 两个可执行文件共用的配置加载、日志初始化与事件日志任务。

pub mod logging;
pub mod settings;

pub use algo_api::server::shutdown_signal;

use thiserror::Error;

/// 启动阶段错误
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Logger already initialized: {0}")]
    LogInit(#[from] tracing_subscriber::util::TryInitError),
}
