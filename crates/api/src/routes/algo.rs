//! # 算法交易路由控制器
//!
//! 实现 `/{app_name}` 前缀下的四个接口，每个请求只发起一次 RPC 调用。

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use algo_core::algo::entity::StartAlgoRequest;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{AlgoTemplateList, AlgoTemplateResponse, Envelope};

// ============================================================
//  Handler 实现
// ============================================================

/// 存活探测
#[utoipa::path(
    get,
    path = "/ping",
    tag = "算法交易 (AlgoTrading)",
    responses(
        (status = 200, description = "固定返回 \"{app_name}: pong\"", body = String)
    )
)]
pub async fn ping(State(state): State<AppState>) -> String {
    format!("{}: pong", state.app_name)
}

/// 列出引擎注册的全部算法模板
///
/// 网关未返回任何结果时按空列表处理。
#[utoipa::path(
    get,
    path = "/get_algo_template",
    tag = "算法交易 (AlgoTrading)",
    responses(
        (status = 200, description = "模板列表获取成功", body = Envelope<AlgoTemplateList>),
        (status = 502, description = "网关不可达"),
        (status = 503, description = "引擎不可用")
    )
)]
pub async fn get_algo_template(
    State(state): State<AppState>,
) -> Result<Json<Envelope<AlgoTemplateList>>, ApiError> {
    let templates = state.rpc.get_algo_template().await?;

    let algo_template: Vec<AlgoTemplateResponse> = templates
        .into_values()
        .map(AlgoTemplateResponse::from)
        .collect();

    Ok(Json(Envelope::ok(AlgoTemplateList { algo_template })))
}

/// 启动一个算法实例
///
/// 请求体原样转发给网关，成功时不返回实例句柄。
#[utoipa::path(
    post,
    path = "/start_algo",
    tag = "算法交易 (AlgoTrading)",
    request_body = StartAlgoRequest,
    responses(
        (status = 200, description = "算法已启动, code = 0"),
        (status = 400, description = "请求体格式错误, code = 1"),
        (status = 404, description = "模板不存在, code = 2"),
        (status = 502, description = "网关不可达, code = 4")
    )
)]
pub async fn start_algo(
    State(state): State<AppState>,
    payload: Result<Json<StartAlgoRequest>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Json(req) = payload?;
    tracing::info!(
        "start_algo: template={} symbol={} {} {}@{}",
        req.template_name,
        req.vt_symbol,
        req.direction,
        req.volume,
        req.price
    );

    state.rpc.start_algo(req).await?;
    Ok(Json(Envelope::empty()))
}

/// 停止全部算法实例
#[utoipa::path(
    post,
    path = "/stop_all",
    tag = "算法交易 (AlgoTrading)",
    responses(
        (status = 200, description = "全部算法已停止, code = 0"),
        (status = 502, description = "网关不可达, code = 4")
    )
)]
pub async fn stop_all(State(state): State<AppState>) -> Result<Json<Envelope<()>>, ApiError> {
    state.rpc.stop_all().await?;
    Ok(Json(Envelope::empty()))
}
