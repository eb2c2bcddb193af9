use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use algo_core::algo::entity::{AlgoSetting, AlgoStatus, AlgoTemplate, Direction, Offset};
use algo_core::engine::error::EngineError;
use algo_core::engine::event::{AlgoEvent, EventBus};
use algo_core::engine::port::{AlgoEngine, AlgoStartParams};
use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::builtin::builtin_templates;

/// # Summary
/// 引擎内的一个算法实例快照。
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoInstance {
    pub algo_name: String,
    pub template_name: String,
    pub vt_symbol: String,
    pub direction: Direction,
    pub offset: Offset,
    pub price: Decimal,
    pub volume: Decimal,
    pub setting: AlgoSetting,
    pub status: AlgoStatus,
}

/// # Summary
/// `AlgoEngine` 的进程内实现。
///
/// # Invariants
/// - 模板注册表在构造后只读。
/// - 实例名称为 `{template_name}_{n}`，`n` 在引擎生命周期内单调递增。
/// - `init_engine` 之前的所有操作返回 `EngineError::NotInitialized`。
pub struct LocalAlgoEngine {
    // 模板注册表，Key 为模板名称
    templates: BTreeMap<String, AlgoTemplate>,
    // 日志与状态事件出口
    bus: Arc<EventBus>,
    initialized: AtomicBool,
    // 实例计数
    counter: AtomicU64,
    // 全部实例 (含已停止)，Key 为实例名称
    instances: DashMap<String, AlgoInstance>,
}

impl LocalAlgoEngine {
    /// # Summary
    /// 创建引擎，注册内置模板并合入配置中的模板。
    ///
    /// # Arguments
    /// * `bus` - 事件总线。
    /// * `extra` - 追加的模板，同名时覆盖内置模板。
    ///
    /// # Returns
    /// * `Arc<Self>`
    pub fn new(bus: Arc<EventBus>, extra: Vec<AlgoTemplate>) -> Arc<Self> {
        let templates = builtin_templates()
            .into_iter()
            .chain(extra)
            .map(|t| (t.template_name.clone(), t))
            .collect();

        Arc::new(Self {
            templates,
            bus,
            initialized: AtomicBool::new(false),
            counter: AtomicU64::new(0),
            instances: DashMap::new(),
        })
    }

    /// 按实例名称排序的全部实例快照。
    pub fn instances(&self) -> Vec<AlgoInstance> {
        let mut all: Vec<AlgoInstance> = self.instances.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.algo_name.cmp(&b.algo_name));
        all
    }

    fn ensure_ready(&self) -> Result<(), EngineError> {
        if self.initialized.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }

    fn write_log(&self, algo_name: &str, msg: &str) {
        info!("[{}] {}", algo_name, msg);
        self.bus.publish(AlgoEvent::Log {
            algo_name: algo_name.to_string(),
            msg: msg.to_string(),
        });
    }

    fn put_status(&self, algo_name: &str, status: AlgoStatus) {
        self.bus.publish(AlgoEvent::Status {
            algo_name: algo_name.to_string(),
            status,
        });
    }

    fn put_parameters(&self, algo_name: &str, parameters: &AlgoSetting) {
        self.bus.publish(AlgoEvent::Parameters {
            algo_name: algo_name.to_string(),
            parameters: parameters.clone(),
        });
    }
}

#[async_trait]
impl AlgoEngine for LocalAlgoEngine {
    async fn init_engine(&self) -> Result<(), EngineError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            warn!("Algo engine already initialized");
            return Ok(());
        }
        info!("Algo engine initialized with {} templates", self.templates.len());
        Ok(())
    }

    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, EngineError> {
        self.ensure_ready()?;
        Ok(self.templates.clone())
    }

    /// # Summary
    /// 创建并登记一个运行中的算法实例。
    ///
    /// # Logic
    /// 1. 校验模板存在、数量为正。
    /// 2. 分配实例名称并以 Running 状态入表。
    /// 3. 依次推送状态、参数与日志事件。
    async fn start_algo(&self, params: AlgoStartParams) -> Result<String, EngineError> {
        self.ensure_ready()?;

        if !self.templates.contains_key(&params.template_name) {
            return Err(EngineError::UnknownTemplate(params.template_name));
        }
        if params.volume <= Decimal::ZERO {
            return Err(EngineError::Rejected(format!(
                "volume must be positive, got {}",
                params.volume
            )));
        }

        let n = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        let algo_name = format!("{}_{}", params.template_name, n);

        let instance = AlgoInstance {
            algo_name: algo_name.clone(),
            template_name: params.template_name,
            vt_symbol: params.vt_symbol,
            direction: params.direction,
            offset: params.offset,
            price: params.price,
            volume: params.volume,
            setting: params.setting,
            status: AlgoStatus::Running,
        };
        let summary = format!(
            "算法启动 {} {} {}@{}",
            instance.vt_symbol, instance.direction, instance.volume, instance.price
        );
        let parameters = instance.setting.clone();
        self.instances.insert(algo_name.clone(), instance);

        self.put_status(&algo_name, AlgoStatus::Running);
        self.put_parameters(&algo_name, &parameters);
        self.write_log(&algo_name, &summary);

        Ok(algo_name)
    }

    async fn stop_all(&self) -> Result<(), EngineError> {
        self.ensure_ready()?;

        let mut stopped = Vec::new();
        for mut entry in self.instances.iter_mut() {
            if entry.status.is_active() {
                entry.status = AlgoStatus::Stopped;
                stopped.push(entry.algo_name.clone());
            }
        }

        for algo_name in &stopped {
            self.put_status(algo_name, AlgoStatus::Stopped);
            self.write_log(algo_name, "算法停止");
        }
        info!("stop_all: {} algo instance(s) stopped", stopped.len());

        Ok(())
    }
}
