use serde::{Deserialize, Serialize};

use crate::algo::entity::StartAlgoRequest;
use crate::error::GatewayError;

/// # Summary
/// 网关对外暴露的 RPC 操作。
///
/// # Invariants
/// - 线上格式为 `{"method": <name>, "params": <参数>}`，方法名与引擎侧保持一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum RpcCall {
    #[serde(rename = "algo_get_algo_template")]
    GetAlgoTemplate,
    #[serde(rename = "algo_start_algo")]
    StartAlgo(StartAlgoRequest),
    #[serde(rename = "algo_stop_all")]
    StopAll,
}

impl RpcCall {
    /// 方法名，用于日志。
    pub fn method(&self) -> &'static str {
        match self {
            RpcCall::GetAlgoTemplate => "algo_get_algo_template",
            RpcCall::StartAlgo(_) => "algo_start_algo",
            RpcCall::StopAll => "algo_stop_all",
        }
    }
}

/// RPC 请求帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: u64,
    pub call: RpcCall,
}

/// # Summary
/// RPC 响应帧。
///
/// # Invariants
/// - `id` 与对应请求一致。
/// - `outcome` 编码为 `{"Ok": <value>}` 或 `{"Err": <GatewayError>}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: u64,
    pub outcome: Result<serde_json::Value, GatewayError>,
}
