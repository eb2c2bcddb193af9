use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use algo_core::error::GatewayError;
use algo_core::rpc::entity::{RpcCall, RpcRequest, RpcResponse};
use algo_core::rpc::port::AlgoRpc;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::codec::{CodecError, read_frame, write_frame};

/// # Summary
/// RPC 服务端，把收到的 `RpcCall` 分发给注入的 `AlgoRpc` 实现。
///
/// # Invariants
/// - 每个连接一个协程，连接内的请求按到达顺序逐个处理。
/// - 业务错误与无法识别的请求都写回响应帧，只有帧损坏或 I/O 失败才关闭连接。
pub struct RpcServer {
    service: Arc<dyn AlgoRpc>,
}

impl RpcServer {
    pub fn new(service: Arc<dyn AlgoRpc>) -> Arc<Self> {
        Arc::new(Self { service })
    }

    /// # Summary
    /// 执行一次调用，成功结果编码为 JSON 值 (无返回值的操作为 `null`)。
    pub async fn dispatch(&self, call: RpcCall) -> Result<Value, GatewayError> {
        match call {
            RpcCall::GetAlgoTemplate => {
                let templates = self.service.get_algo_template().await?;
                serde_json::to_value(templates)
                    .map_err(|e| GatewayError::Engine(format!("Failed to encode templates: {}", e)))
            }
            RpcCall::StartAlgo(req) => {
                self.service.start_algo(req).await?;
                Ok(Value::Null)
            }
            RpcCall::StopAll => {
                self.service.stop_all().await?;
                Ok(Value::Null)
            }
        }
    }

    /// 持续接受连接直到 `shutdown` 完成。
    pub async fn serve<F>(self: Arc<Self>, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("RPC server listening on {}", listener.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("RPC server shutting down");
                    break;
                }

                accept_res = listener.accept() => {
                    let (stream, peer) = match accept_res {
                        Ok(v) => v,
                        Err(e) => { error!("accept error: {e}"); continue; }
                    };

                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("set_nodelay failed for {peer}: {e}");
                    }

                    let server = self.clone();
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream, peer).await {
                            warn!("RPC client {peer} error: {e}");
                        }
                    });
                }
            }
        }

        Ok(())
    }

    async fn handle_connection(&self, stream: TcpStream, peer: SocketAddr) -> Result<(), CodecError> {
        debug!("RPC client {peer} connected");
        let (rd, mut wr) = stream.into_split();
        let mut reader = BufReader::new(rd);

        while let Some(body) = read_frame::<_, Value>(&mut reader).await? {
            let resp = match RpcRequest::deserialize(&body) {
                Ok(req) => {
                    let method = req.call.method();
                    let outcome = self.dispatch(req.call).await;
                    match &outcome {
                        Ok(_) => debug!("{method} #{} ok", req.id),
                        Err(e) => warn!("{method} #{} failed: {e}", req.id),
                    }
                    RpcResponse { id: req.id, outcome }
                }
                Err(e) => malformed_request(&body, &e),
            };
            write_frame(&mut wr, &resp).await?;
        }

        debug!("RPC client {peer} disconnected");
        Ok(())
    }
}

/// 帧完整但内容无法识别：尽量取回 id，以 `Validation` 错误应答，连接保持可用。
fn malformed_request(body: &Value, err: &serde_json::Error) -> RpcResponse {
    let id = body.get("id").and_then(Value::as_u64).unwrap_or(0);
    warn!("Malformed RPC request #{id}: {err}");
    RpcResponse {
        id,
        outcome: Err(GatewayError::Validation(format!("Malformed request: {}", err))),
    }
}
