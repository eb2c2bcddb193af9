use std::sync::Arc;

use algo_api::server::{AppState, start_server};
use algo_app::{logging, settings};
use algo_rpc::client::RpcClient;
use tracing::info;

/// HTTP 门面入口，网关连接在首次请求时建立。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = settings::load()?;
    let _guard = logging::init(&config.log, "algo-web")?;
    info!("Forwarding {} requests to gateway at {}", config.app_name, config.rpc.addr);

    let client = Arc::new(RpcClient::new(config.rpc.addr.clone()));
    let state = AppState::new(&config.app_name, client);

    start_server(state, &config.http.bind_addr()).await
}
