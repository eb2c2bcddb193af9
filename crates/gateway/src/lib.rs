//! # `algo-gateway` - 网关服务端
//!
//! 与引擎同进程运行，把具名 RPC 操作翻译为对 `AlgoEngine` 的调用，不附加任何业务逻辑。

pub mod server;
