//! # `algo-core` - 领域核心
//!
//! 算法交易网关的实体、端口 (Trait) 与统一错误定义。
//! 其余各 crate 只依赖这里的抽象，具体实现由 `algo-app` 在启动时注入。

pub mod algo {
    pub mod entity;
    pub mod setting;
}

pub mod engine {
    pub mod error;
    pub mod event;
    pub mod port;
}

pub mod rpc {
    pub mod entity;
    pub mod port;
}

pub mod config;
pub mod error;

#[cfg(feature = "test-utils")]
pub mod testing;
