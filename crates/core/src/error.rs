//! # 网关统一错误
//!
//! RPC 服务端、RPC 客户端与 HTTP 门面共用同一套错误分类，
//! 通过 serde 原样跨越 RPC 边界。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::error::EngineError;

/// # Summary
/// 网关错误分类。
///
/// # Invariants
/// - 每个变体对应一个固定的非零信封错误码，0 保留给成功。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum GatewayError {
    /// 请求体格式错误
    #[error("ValidationError: {0}")]
    #[serde(rename = "ValidationError")]
    Validation(String),

    /// 请求的模板未在引擎中注册
    #[error("UnknownTemplate: {0}")]
    UnknownTemplate(String),

    /// 引擎未初始化或未注册
    #[error("EngineUnavailable: {0}")]
    EngineUnavailable(String),

    /// RPC 调用无法到达服务端
    #[error("TransportError: {0}")]
    #[serde(rename = "TransportError")]
    Transport(String),

    /// 引擎执行失败
    #[error("EngineError: {0}")]
    #[serde(rename = "EngineError")]
    Engine(String),
}

impl GatewayError {
    /// 信封中的错误码。
    pub fn code(&self) -> i32 {
        match self {
            GatewayError::Validation(_) => 1,
            GatewayError::UnknownTemplate(_) => 2,
            GatewayError::EngineUnavailable(_) => 3,
            GatewayError::Transport(_) => 4,
            GatewayError::Engine(_) => 5,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "ValidationError",
            GatewayError::UnknownTemplate(_) => "UnknownTemplate",
            GatewayError::EngineUnavailable(_) => "EngineUnavailable",
            GatewayError::Transport(_) => "TransportError",
            GatewayError::Engine(_) => "EngineError",
        }
    }
}

/// 从 `EngineError` 转换
impl From<EngineError> for GatewayError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotInitialized => GatewayError::EngineUnavailable(err.to_string()),
            EngineError::UnknownTemplate(name) => GatewayError::UnknownTemplate(name),
            EngineError::Rejected(msg) | EngineError::Internal(msg) => GatewayError::Engine(msg),
        }
    }
}
