use std::collections::BTreeMap;
use std::sync::Arc;

use algo_core::algo::entity::{AlgoTemplate, StartAlgoRequest};
use algo_core::algo::setting::{SettingOverrides, algo_parameters, merge};
use algo_core::engine::event::{AlgoEvent, EventBus};
use algo_core::engine::port::{AlgoEngine, AlgoStartParams};
use algo_core::error::GatewayError;
use algo_core::rpc::port::AlgoRpc;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// # Summary
/// 网关服务端，引擎之上的无状态门面。
/// 编译期仅依赖 `algo-core` 中的 Trait 定义，引擎与事件总线通过构造函数注入。
///
/// # Invariants
/// - 不持有任何可变状态，运行中的算法只存在于引擎内部。
/// - 引擎错误不做重试或吞没，转换为 `GatewayError` 后原样返回给 RPC 层。
pub struct AlgoGateway {
    // 算法引擎
    engine: Arc<dyn AlgoEngine>,
    // 引擎事件总线
    bus: Arc<EventBus>,
}

impl AlgoGateway {
    /// # Summary
    /// 创建网关并初始化引擎。
    ///
    /// # Arguments
    /// * `engine` - 引擎接口的具体实现。
    /// * `bus` - 引擎使用的事件总线。
    ///
    /// # Returns
    /// * `Result<Arc<Self>, GatewayError>` - 引擎初始化失败时返回错误。
    pub async fn new(
        engine: Arc<dyn AlgoEngine>,
        bus: Arc<EventBus>,
    ) -> Result<Arc<Self>, GatewayError> {
        engine.init_engine().await?;
        info!("AlgoGateway ready");
        Ok(Arc::new(Self { engine, bus }))
    }

    /// 订阅引擎事件。
    pub fn subscribe(&self) -> broadcast::Receiver<AlgoEvent> {
        self.bus.subscribe()
    }
}

#[async_trait]
impl AlgoRpc for AlgoGateway {
    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, GatewayError> {
        Ok(self.engine.get_algo_template().await?)
    }

    /// # Summary
    /// 启动一个算法实例。
    ///
    /// # Logic
    /// 1. 在引擎注册表中查找模板，缺失则返回 `UnknownTemplate`，不调用引擎启动。
    /// 2. 以调用方参数覆盖模板默认参数，生成新的参数表。
    /// 3. 拆出标识字段，其余作为算法参数交给引擎。
    async fn start_algo(&self, req: StartAlgoRequest) -> Result<(), GatewayError> {
        let templates = self.engine.get_algo_template().await?;
        let template = templates
            .get(&req.template_name)
            .ok_or_else(|| GatewayError::UnknownTemplate(req.template_name.clone()))?;

        let merged = merge(&template.default_setting, &SettingOverrides::from(&req));
        debug!("start_algo {} merged setting: {:?}", req.template_name, merged);

        let algo_name = self
            .engine
            .start_algo(AlgoStartParams {
                setting: algo_parameters(&merged),
                template_name: req.template_name,
                vt_symbol: req.vt_symbol,
                direction: req.direction,
                offset: req.offset,
                price: req.price,
                volume: req.volume,
            })
            .await?;

        info!("Algo {} started", algo_name);
        Ok(())
    }

    async fn stop_all(&self) -> Result<(), GatewayError> {
        self.engine.stop_all().await?;
        info!("All algos stopped");
        Ok(())
    }
}
