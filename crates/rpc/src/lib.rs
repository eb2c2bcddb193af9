//! # `algo-rpc` - RPC 传输层
//!
//! 长度前缀 + JSON 的帧格式，`RpcServer` 把请求分发给任意 `AlgoRpc` 实现，
//! `RpcClient` 则以同一接口跨进程调用服务端。

pub mod client;
pub mod codec;
pub mod server;
