use std::sync::Arc;

use algo_core::algo::entity::{AlgoStatus, Direction, Offset, StartAlgoRequest};
use algo_core::engine::event::{AlgoEvent, EventBus};
use algo_core::error::GatewayError;
use algo_core::rpc::port::AlgoRpc;
use algo_core::testing::MockAlgoEngine;
use algo_engine::local::LocalAlgoEngine;
use algo_gateway::server::AlgoGateway;
use rust_decimal_macros::dec;
use serde_json::json;

fn twap_request(template: &str) -> StartAlgoRequest {
    StartAlgoRequest {
        template_name: template.to_string(),
        vt_symbol: "BTC-USD".to_string(),
        direction: Direction::Long,
        offset: Offset::Open,
        price: dec!(100.5),
        volume: dec!(2),
        interval: 30,
        time: 0,
    }
}

async fn gateway_with(engine: Arc<MockAlgoEngine>) -> Arc<AlgoGateway> {
    AlgoGateway::new(engine, Arc::new(EventBus::default()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_construction_initializes_engine_once() {
    let engine = Arc::new(MockAlgoEngine::with_template("TWAP", json!({"interval": 60})));
    let _gateway = gateway_with(engine.clone()).await;
    assert_eq!(engine.init_calls(), 1);
}

#[tokio::test]
async fn test_templates_match_registry() {
    let engine = Arc::new(MockAlgoEngine::new(vec![
        algo_core::algo::entity::AlgoTemplate::new("TWAP", "TWAP", Default::default()),
        algo_core::algo::entity::AlgoTemplate::new("Iceberg", "Iceberg", Default::default()),
    ]));
    let gateway = gateway_with(engine).await;

    let templates = gateway.get_algo_template().await.unwrap();
    let names: Vec<&str> = templates.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Iceberg", "TWAP"]);
}

#[tokio::test]
async fn test_start_algo_merges_setting() {
    let engine = Arc::new(MockAlgoEngine::with_template(
        "TWAP",
        json!({"interval": 60, "price_add": 0.5}),
    ));
    let gateway = gateway_with(engine.clone()).await;

    gateway.start_algo(twap_request("TWAP")).await.unwrap();

    let calls = engine.start_calls().await;
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.template_name, "TWAP");
    assert_eq!(call.vt_symbol, "BTC-USD");
    assert_eq!(call.direction, Direction::Long);
    assert_eq!(call.offset, Offset::Open);
    assert_eq!(call.price, dec!(100.5));
    assert_eq!(call.volume, dec!(2));
    assert_eq!(call.setting["interval"], json!(30));
    assert_eq!(call.setting["price_add"], json!(0.5));
    assert!(!call.setting.contains_key("vt_symbol"));
}

#[tokio::test]
async fn test_unknown_template_never_reaches_engine() {
    let engine = Arc::new(MockAlgoEngine::with_template("TWAP", json!({"interval": 60})));
    let gateway = gateway_with(engine.clone()).await;

    let err = gateway.start_algo(twap_request("UNKNOWN")).await.unwrap_err();
    assert_eq!(err, GatewayError::UnknownTemplate("UNKNOWN".into()));
    assert!(engine.start_calls().await.is_empty());
}

#[tokio::test]
async fn test_stop_all_issues_single_halt() {
    let engine = Arc::new(MockAlgoEngine::with_template("TWAP", json!({"interval": 60})));
    let gateway = gateway_with(engine.clone()).await;

    gateway.stop_all().await.unwrap();
    assert_eq!(engine.stop_calls(), 1);

    for _ in 0..3 {
        gateway.start_algo(twap_request("TWAP")).await.unwrap();
    }
    gateway.stop_all().await.unwrap();
    assert_eq!(engine.stop_calls(), 2);
}

#[tokio::test]
async fn test_engine_unavailable_propagates() {
    let gateway = gateway_with(Arc::new(MockAlgoEngine::unavailable())).await;

    let err = gateway.get_algo_template().await.unwrap_err();
    assert!(matches!(err, GatewayError::EngineUnavailable(_)));
    assert!(matches!(
        gateway.stop_all().await,
        Err(GatewayError::EngineUnavailable(_))
    ));
}

#[tokio::test]
async fn test_with_local_engine_events() {
    let bus = Arc::new(EventBus::default());
    let engine = LocalAlgoEngine::new(bus.clone(), vec![]);
    let gateway = AlgoGateway::new(engine.clone(), bus).await.unwrap();
    let mut events = gateway.subscribe();

    gateway.start_algo(twap_request("TwapAlgo")).await.unwrap();
    gateway.stop_all().await.unwrap();

    let first = events.recv().await.unwrap();
    assert_eq!(
        first,
        AlgoEvent::Status {
            algo_name: "TwapAlgo_1".into(),
            status: AlgoStatus::Running
        }
    );
    assert_eq!(engine.instances()[0].status, AlgoStatus::Stopped);
    assert_eq!(engine.instances()[0].setting["interval"], json!(30));
}
