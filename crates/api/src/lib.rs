//! # `algo-api` - HTTP 门面
//!
//! 独立进程运行的 HTTP 路由层。
//! 使用 `axum` 构建路由，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收 JSON 请求，经 `AlgoRpc` 客户端转发给网关服务端
//! - 将结果统一包装为 `{data, error, code}` 信封
//! - 在边界处捕获全部错误，不向客户端泄露传输层异常

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
