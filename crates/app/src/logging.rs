use algo_core::config::LogConfig;
use algo_core::engine::event::AlgoEvent;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::AppError;

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. 过滤规则优先取 `RUST_LOG`，否则取 `log.level`。
/// 2. 始终输出到标准输出。
/// 3. 配置了 `log.dir` 时额外写入 `{dir}/{file_prefix}.log.YYYY-MM-DD`，按天滚动。
///
/// # Returns
/// * `Option<WorkerGuard>` - 文件写入线程的守卫，需保持到进程退出。
pub fn init(cfg: &LogConfig, file_prefix: &str) -> Result<Option<WorkerGuard>, AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cfg.level)?,
    };

    let (file_layer, guard) = match &cfg.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", file_prefix));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// 把引擎事件转成日志，直到总线关闭
pub fn spawn_event_logger(mut rx: broadcast::Receiver<AlgoEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(AlgoEvent::Log { algo_name, msg }) => info!("[{}] {}", algo_name, msg),
                Ok(AlgoEvent::Status { algo_name, status }) => {
                    info!("[{}] status -> {:?}", algo_name, status)
                }
                Ok(AlgoEvent::Parameters {
                    algo_name,
                    parameters,
                }) => debug!("[{}] parameters {:?}", algo_name, parameters),
                Err(RecvError::Lagged(n)) => warn!("Event logger lagged, {} events skipped", n),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
