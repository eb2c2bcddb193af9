use crate::algo::entity::{AlgoSetting, AlgoTemplate, Direction, Offset};
use crate::engine::error::EngineError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// # Summary
/// 启动一个算法实例所需的全部参数。
///
/// # Invariants
/// - `setting` 只含算法私有参数，标识字段以独立字段传入。
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoStartParams {
    pub template_name: String,
    pub vt_symbol: String,
    pub direction: Direction,
    pub offset: Offset,
    pub price: Decimal,
    pub volume: Decimal,
    pub setting: AlgoSetting,
}

/// # Summary
/// 算法引擎的公共接口 (Port)。
/// 网关只通过此接口访问引擎，引擎的调度、下单与持仓逻辑都在实现方内部。
///
/// # Invariants
/// - 实现类必须保证线程安全 (`Send` + `Sync`)。
#[async_trait]
pub trait AlgoEngine: Send + Sync {
    /// # Summary
    /// 初始化引擎，网关构造时调用一次。
    async fn init_engine(&self) -> Result<(), EngineError>;

    /// # Summary
    /// 返回当前注册的全部算法模板。
    ///
    /// # Returns
    /// * `Result<BTreeMap<String, AlgoTemplate>, EngineError>` - Key 为模板名称。
    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, EngineError>;

    /// # Summary
    /// 启动一个新的算法实例。
    ///
    /// # Arguments
    /// * `params` - 合并后的启动参数。
    ///
    /// # Returns
    /// * `Result<String, EngineError>` - 引擎内部分配的实例名称。
    async fn start_algo(&self, params: AlgoStartParams) -> Result<String, EngineError>;

    /// # Summary
    /// 无条件停止所有运行中的算法实例。
    async fn stop_all(&self) -> Result<(), EngineError>;
}
