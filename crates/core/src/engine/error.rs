use thiserror::Error;

/// # Summary
/// 算法引擎域错误枚举。
///
/// # Invariants
/// - 覆盖引擎未就绪、模板缺失以及引擎拒绝执行的场景。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // 引擎尚未完成 init_engine
    #[error("Algo engine is not initialized")]
    NotInitialized,
    // 模板未注册
    #[error("Unknown algo template: {0}")]
    UnknownTemplate(String),
    // 引擎拒绝本次请求 (参数非法等)
    #[error("Algo engine rejected the request: {0}")]
    Rejected(String),
    // 引擎内部故障
    #[error("Algo engine internal error: {0}")]
    Internal(String),
}
