use std::sync::Arc;

use algo_app::logging::{self, spawn_event_logger};
use algo_app::{settings, shutdown_signal};
use algo_core::engine::event::EventBus;
use algo_engine::local::LocalAlgoEngine;
use algo_gateway::server::AlgoGateway;
use algo_rpc::server::RpcServer;
use tokio::net::TcpListener;
use tracing::info;

/// # Summary
/// 网关服务端入口。
///
/// # Logic
/// 1. 加载配置并初始化日志。
/// 2. 创建事件总线与本地引擎，注入网关 (网关构造时完成引擎初始化)。
/// 3. 在 `rpc.addr` 上提供 RPC 服务，Ctrl-C 后退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = settings::load()?;
    let _guard = logging::init(&config.log, "algo-gateway")?;
    info!("Algo gateway server starting...");

    let bus = Arc::new(EventBus::default());
    let engine = LocalAlgoEngine::new(bus.clone(), config.engine.templates.clone());
    let gateway = AlgoGateway::new(engine, bus).await?;
    let _events = spawn_event_logger(gateway.subscribe());

    let listener = TcpListener::bind(&config.rpc.addr).await?;
    info!("RPC gateway listening on {}", config.rpc.addr);

    RpcServer::new(gateway)
        .serve(listener, shutdown_signal())
        .await?;

    info!("Algo gateway server stopped");
    Ok(())
}
