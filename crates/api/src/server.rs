//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 持有并调用。

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use algo_core::rpc::port::AlgoRpc;

use crate::routes::algo;

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `rpc` 在服务启动前注入，所有请求共享同一个客户端句柄。
#[derive(Clone)]
pub struct AppState {
    /// 路由前缀与 ping 返回值中的应用名
    pub app_name: Arc<str>,
    /// 网关 RPC 接口
    pub rpc: Arc<dyn AlgoRpc>,
}

impl AppState {
    pub fn new(app_name: &str, rpc: Arc<dyn AlgoRpc>) -> Self {
        Self {
            app_name: Arc::from(app_name),
            rpc,
        }
    }
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "算法交易网关 API",
        version = "0.1.0",
        description = "算法模板查询、算法启动与全部停止。所有业务接口返回 {data, error, code} 信封，code = 0 表示成功。",
        license(name = "MIT")
    ),
    tags(
        (name = "算法交易 (AlgoTrading)", description = "转发至网关服务端的算法操作")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 业务路由挂载在 `/{app_name}` 之下。
/// 2. 合并 Swagger UI 与 OpenAPI JSON。
/// 3. 应用 CORS 中间件。
pub fn build_router(state: AppState) -> Router {
    let algo_router = OpenApiRouter::new()
        .routes(routes!(algo::ping))
        .routes(routes!(algo::get_algo_template))
        .routes(routes!(algo::start_algo))
        .routes(routes!(algo::stop_all));

    let prefix = format!("/{}", state.app_name);
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(&prefix, algo_router)
        .with_state(state)
        .split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 构建路由并启动 HTTP 监听，收到 Ctrl-C 后优雅退出。
///
/// # Arguments
/// * `state` - 由外部注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8000"`
pub async fn start_server(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app_name = state.app_name.clone();
    let app = build_router(state);

    tracing::info!("🚀 {} web API listening on {}", app_name, bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// 等待 Ctrl-C；监听失败时永不返回。网关服务端进程同样使用它。
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
