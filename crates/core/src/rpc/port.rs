use crate::algo::entity::{AlgoTemplate, StartAlgoRequest};
use crate::error::GatewayError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// # Summary
/// 网关的强类型 RPC 接口，每个操作一个方法。
///
/// # Logic
/// - 进程内由 `AlgoGateway` 直接实现。
/// - 跨进程由 `RpcClient` 实现，经 TCP 转发给 `RpcServer`。
///
/// # Invariants
/// - 实现类必须保证线程安全 (`Send` + `Sync`)。
#[async_trait]
pub trait AlgoRpc: Send + Sync {
    /// 列出引擎注册的全部模板，Key 为模板名称。
    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, GatewayError>;

    /// 启动一个算法实例，不返回实例句柄。
    async fn start_algo(&self, req: StartAlgoRequest) -> Result<(), GatewayError>;

    /// 停止全部算法实例。
    async fn stop_all(&self) -> Result<(), GatewayError>;
}
