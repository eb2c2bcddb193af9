use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use algo_core::algo::entity::{AlgoTemplate, Direction, Offset, StartAlgoRequest};
use algo_core::engine::event::EventBus;
use algo_core::error::GatewayError;
use algo_core::rpc::entity::{RpcRequest, RpcResponse};
use algo_core::rpc::port::AlgoRpc;
use algo_core::testing::MockAlgoEngine;
use algo_gateway::server::AlgoGateway;
use algo_rpc::client::RpcClient;
use algo_rpc::codec::{read_frame, write_frame};
use algo_rpc::server::RpcServer;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

/// 记录服务端实际收到的请求
#[derive(Default)]
struct RecordingRpc {
    received: Mutex<Vec<StartAlgoRequest>>,
}

#[async_trait]
impl AlgoRpc for RecordingRpc {
    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, GatewayError> {
        Ok(BTreeMap::new())
    }

    async fn start_algo(&self, req: StartAlgoRequest) -> Result<(), GatewayError> {
        self.received.lock().await.push(req);
        Ok(())
    }

    async fn stop_all(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// 模板查询很慢的服务，用于制造中途取消的调用
#[derive(Default)]
struct SlowTemplatesRpc {
    stops: AtomicUsize,
}

#[async_trait]
impl AlgoRpc for SlowTemplatesRpc {
    async fn get_algo_template(&self) -> Result<BTreeMap<String, AlgoTemplate>, GatewayError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(BTreeMap::new())
    }

    async fn start_algo(&self, _req: StartAlgoRequest) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn stop_all(&self) -> Result<(), GatewayError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn request(template: &str) -> StartAlgoRequest {
    StartAlgoRequest {
        template_name: template.to_string(),
        vt_symbol: "BTC-USD".to_string(),
        direction: Direction::Short,
        offset: Offset::CloseToday,
        price: dec!(100.5),
        volume: dec!(2),
        interval: 30,
        time: 1_710_000_000,
    }
}

// 在随机端口启动服务端，返回地址与关闭句柄
async fn spawn_server(service: Arc<dyn AlgoRpc>) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, rx) = oneshot::channel::<()>();

    let server = RpcServer::new(service);
    tokio::spawn(async move {
        server
            .serve(listener, async {
                rx.await.unwrap_or(());
            })
            .await
            .unwrap();
    });

    (addr, tx)
}

async fn spawn_gateway(engine: Arc<MockAlgoEngine>) -> (String, oneshot::Sender<()>) {
    let gateway = AlgoGateway::new(engine, Arc::new(EventBus::default()))
        .await
        .unwrap();
    spawn_server(gateway).await
}

#[tokio::test]
async fn test_start_request_survives_the_wire() {
    let recorder = Arc::new(RecordingRpc::default());
    let (addr, _shutdown) = spawn_server(recorder.clone()).await;

    let client = RpcClient::connect(addr).await.unwrap();
    let sent = request("TWAP");
    client.start_algo(sent.clone()).await.unwrap();

    let received = recorder.received.lock().await;
    assert_eq!(received.as_slice(), &[sent]);
}

#[tokio::test]
async fn test_templates_over_rpc() {
    let engine = Arc::new(MockAlgoEngine::with_template("TWAP", json!({"interval": 60})));
    let (addr, _shutdown) = spawn_gateway(engine).await;

    let client = RpcClient::new(addr);
    let templates = client.get_algo_template().await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates["TWAP"].default_setting["interval"], json!(60));
}

#[tokio::test]
async fn test_gateway_errors_cross_the_wire_unchanged() {
    let engine = Arc::new(MockAlgoEngine::with_template("TWAP", json!({"interval": 60})));
    let (addr, _shutdown) = spawn_gateway(engine.clone()).await;
    let client = RpcClient::new(addr);

    let err = client.start_algo(request("UNKNOWN")).await.unwrap_err();
    assert_eq!(err, GatewayError::UnknownTemplate("UNKNOWN".into()));
    assert!(engine.start_calls().await.is_empty());

    // 业务错误不影响连接，后续调用照常
    client.start_algo(request("TWAP")).await.unwrap();
    client.stop_all().await.unwrap();
    assert_eq!(engine.start_calls().await.len(), 1);
    assert_eq!(engine.stop_calls(), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // 先占用再释放端口，确保无人监听
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let client = RpcClient::new(addr.clone());
    let err = client.stop_all().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));

    assert!(matches!(
        RpcClient::connect(addr).await,
        Err(GatewayError::Transport(_))
    ));
}

#[tokio::test]
async fn test_null_template_result_is_empty() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let req: RpcRequest = read_frame(&mut stream).await.unwrap().unwrap();
        let resp = RpcResponse {
            id: req.id,
            outcome: Ok(serde_json::Value::Null),
        };
        write_frame(&mut stream, &resp).await.unwrap();
    });

    let client = RpcClient::new(addr);
    let templates = client.get_algo_template().await.unwrap();
    assert!(templates.is_empty());
}

#[tokio::test]
async fn test_client_reconnects_after_connection_loss() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    // 第一个连接读完请求后直接断开，第二个连接正常应答
    tokio::spawn(async move {
        let (mut first, _) = listener.accept().await.unwrap();
        let _req: Option<RpcRequest> = read_frame(&mut first).await.unwrap();
        drop(first);

        let (mut second, _) = listener.accept().await.unwrap();
        let req: RpcRequest = read_frame(&mut second).await.unwrap().unwrap();
        write_frame(
            &mut second,
            &RpcResponse {
                id: req.id,
                outcome: Ok(serde_json::Value::Null),
            },
        )
        .await
        .unwrap();
    });

    let client = RpcClient::new(addr);
    assert!(matches!(
        client.stop_all().await,
        Err(GatewayError::Transport(_))
    ));
    client.stop_all().await.unwrap();
}

#[tokio::test]
async fn test_cancelled_call_leaves_no_stale_reply() {
    let service = Arc::new(SlowTemplatesRpc::default());
    let (addr, _shutdown) = spawn_server(service.clone()).await;
    let client = RpcClient::new(addr);

    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), client.get_algo_template()).await;
    assert!(cancelled.is_err());

    // 被取消调用的响应不能被下一次调用读到
    client.stop_all().await.unwrap();
    assert_eq!(service.stops.load(Ordering::SeqCst), 1);
    assert!(client.get_algo_template().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_request_gets_validation_reply() {
    let engine = Arc::new(MockAlgoEngine::with_template("TWAP", json!({"interval": 60})));
    let (addr, _shutdown) = spawn_gateway(engine.clone()).await;
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();

    // 未知方法
    write_frame(
        &mut stream,
        &json!({"id": 7, "call": {"method": "algo_pause_algo", "params": null}}),
    )
    .await
    .unwrap();
    let resp: RpcResponse = read_frame(&mut stream).await.unwrap().unwrap();
    assert_eq!(resp.id, 7);
    assert!(matches!(resp.outcome, Err(GatewayError::Validation(_))));

    // 非法 direction
    let mut params = serde_json::to_value(request("TWAP")).unwrap();
    params["direction"] = json!("sideways");
    write_frame(
        &mut stream,
        &json!({"id": 8, "call": {"method": "algo_start_algo", "params": params}}),
    )
    .await
    .unwrap();
    let resp: RpcResponse = read_frame(&mut stream).await.unwrap().unwrap();
    assert_eq!(resp.id, 8);
    assert!(matches!(resp.outcome, Err(GatewayError::Validation(_))));
    assert!(engine.start_calls().await.is_empty());

    // 连接仍然可用
    write_frame(
        &mut stream,
        &RpcRequest {
            id: 9,
            call: algo_core::rpc::entity::RpcCall::StopAll,
        },
    )
    .await
    .unwrap();
    let resp: RpcResponse = read_frame(&mut stream).await.unwrap().unwrap();
    assert_eq!(resp.id, 9);
    assert!(resp.outcome.is_ok());
    assert_eq!(engine.stop_calls(), 1);
}
