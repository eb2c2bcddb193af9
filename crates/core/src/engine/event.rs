use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::algo::entity::{AlgoSetting, AlgoStatus};

/// # Summary
/// 引擎向外推送的算法事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlgoEvent {
    /// 算法日志
    Log { algo_name: String, msg: String },
    /// 算法状态变化
    Status { algo_name: String, status: AlgoStatus },
    /// 算法实例的参数表
    Parameters {
        algo_name: String,
        parameters: AlgoSetting,
    },
}

/// # Summary
/// 进程内事件总线，基于 `tokio::sync::broadcast`。
///
/// # Invariants
/// - 没有订阅者时发布的事件被直接丢弃。
/// - 订阅者消费过慢时会丢失最旧的事件 (`RecvError::Lagged`)。
pub struct EventBus {
    sender: broadcast::Sender<AlgoEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: AlgoEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("AlgoEvent dropped: no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlgoEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
