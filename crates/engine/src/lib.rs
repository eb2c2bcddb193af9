//! # `algo-engine` - 进程内参考引擎
//!
//! 实现 `AlgoEngine` 端口：维护模板注册表与算法实例的生命周期，并向事件总线推送日志与状态。
//! 不包含下单、行情订阅等执行逻辑。

pub mod builtin;
pub mod local;
