use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use algo_core::algo::entity::{AlgoTemplate, StartAlgoRequest};
use algo_core::error::GatewayError;
use algo_core::rpc::entity::{RpcCall, RpcRequest, RpcResponse};
use algo_core::rpc::port::AlgoRpc;
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::codec::{CodecError, read_frame, write_frame};

/// 一条已建立的 TCP 连接
struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(addr: &str) -> Result<Self, CodecError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (rd, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(rd),
            writer,
        })
    }

    async fn round_trip(&mut self, req: &RpcRequest) -> Result<RpcResponse, CodecError> {
        write_frame(&mut self.writer, req).await?;
        read_frame(&mut self.reader)
            .await?
            .ok_or(CodecError::ConnectionClosed)
    }
}

/// # Summary
/// RPC 客户端，以 `AlgoRpc` 接口远程调用网关服务端。
///
/// # Invariants
/// - 全部调用共享一条长连接，由 `Mutex` 串行化，同一时刻只有一个请求在途。
/// - 首次调用时建立连接；任何 I/O 错误或调用被取消后丢弃连接，下次调用重新建立。
/// - 不做超时与重试。
pub struct RpcClient {
    addr: String,
    conn: Mutex<Option<Connection>>,
    next_id: AtomicU64,
}

impl RpcClient {
    /// 创建客户端，不立即连接。
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            conn: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// 创建客户端并立即建立连接。
    pub async fn connect(addr: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Self::new(addr);
        let conn = Connection::open(&client.addr)
            .await
            .map_err(|e| transport_error(&client.addr, e))?;
        *client.conn.lock().await = Some(conn);
        Ok(client)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// # Summary
    /// 发送一次调用并等待响应。
    ///
    /// # Logic
    /// 1. 取得连接锁，从槽位中取出连接，没有则新建。
    /// 2. 写请求帧、读响应帧。
    /// 3. 收到 id 匹配的响应后才把连接放回槽位。
    /// 4. I/O 失败或响应 id 不匹配时丢弃连接并返回 `Transport` 错误。
    ///
    /// # Invariants
    /// - 调用在中途被取消 (超时、HTTP 客户端断开) 时连接随之丢弃，
    ///   后续调用不会读到残留的响应帧。
    ///
    /// # Returns
    /// * `Result<Value, GatewayError>` - 服务端返回的业务结果或错误。
    pub async fn call(&self, call: RpcCall) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let method = call.method();
        let req = RpcRequest { id, call };

        let mut guard = self.conn.lock().await;
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => {
                debug!("Connecting to RPC server {}", self.addr);
                Connection::open(&self.addr)
                    .await
                    .map_err(|e| transport_error(&self.addr, e))?
            }
        };

        match conn.round_trip(&req).await {
            Ok(resp) if resp.id == id => {
                *guard = Some(conn);
                resp.outcome
            }
            Ok(resp) => {
                warn!("{method}: response id {} does not match request id {}", resp.id, id);
                Err(GatewayError::Transport(format!(
                    "Out-of-order response from {}",
                    self.addr
                )))
            }
            Err(e) => {
                warn!("{method} failed on {}: {}", self.addr, e);
                Err(transport_error(&self.addr, e))
            }
        }
    }
}

#[async_trait]
impl AlgoRpc for RpcClient {
    /// 服务端返回 `null` 时视为空集合。
    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, GatewayError> {
        let value = self.call(RpcCall::GetAlgoTemplate).await?;
        let templates: Option<BTreeMap<String, AlgoTemplate>> = serde_json::from_value(value)
            .map_err(|e| GatewayError::Transport(format!("Malformed template list: {}", e)))?;
        Ok(templates.unwrap_or_default())
    }

    async fn start_algo(&self, req: StartAlgoRequest) -> Result<(), GatewayError> {
        self.call(RpcCall::StartAlgo(req)).await.map(|_| ())
    }

    async fn stop_all(&self) -> Result<(), GatewayError> {
        self.call(RpcCall::StopAll).await.map(|_| ())
    }
}

fn transport_error(addr: &str, err: CodecError) -> GatewayError {
    GatewayError::Transport(format!("{}: {}", addr, err))
}
