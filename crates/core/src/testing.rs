//! # 测试替身
//!
//! 仅在 `test-utils` feature 下编译，供各 crate 的集成测试共用。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::algo::entity::{AlgoSetting, AlgoTemplate};
use crate::engine::error::EngineError;
use crate::engine::port::{AlgoEngine, AlgoStartParams};

/// # Summary
/// 记录调用的模拟引擎。
///
/// # Invariants
/// - 模板注册表在构造时固定。
/// - `unavailable` 为 true 时所有查询与操作均返回 `EngineError::NotInitialized`。
pub struct MockAlgoEngine {
    templates: BTreeMap<String, AlgoTemplate>,
    unavailable: bool,
    init_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    start_calls: Mutex<Vec<AlgoStartParams>>,
}

impl MockAlgoEngine {
    pub fn new(templates: Vec<AlgoTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.template_name.clone(), t))
                .collect(),
            unavailable: false,
            init_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            start_calls: Mutex::new(Vec::new()),
        }
    }

    /// 构造一个始终不可用的引擎。
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::new())
        }
    }

    /// 单模板快捷构造，`defaults` 为 JSON 对象。
    pub fn with_template(name: &str, defaults: serde_json::Value) -> Self {
        let setting: AlgoSetting = match defaults {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => AlgoSetting::new(),
        };
        Self::new(vec![AlgoTemplate::new(name, name, setting)])
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub async fn start_calls(&self) -> Vec<AlgoStartParams> {
        self.start_calls.lock().await.clone()
    }

    fn check_available(&self) -> Result<(), EngineError> {
        if self.unavailable {
            Err(EngineError::NotInitialized)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AlgoEngine for MockAlgoEngine {
    async fn init_engine(&self) -> Result<(), EngineError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, EngineError> {
        self.check_available()?;
        Ok(self.templates.clone())
    }

    async fn start_algo(&self, params: AlgoStartParams) -> Result<String, EngineError> {
        self.check_available()?;
        let mut calls = self.start_calls.lock().await;
        calls.push(params.clone());
        Ok(format!("{}_{}", params.template_name, calls.len()))
    }

    async fn stop_all(&self) -> Result<(), EngineError> {
        self.check_available()?;
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
