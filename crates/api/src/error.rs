//! # API 统一错误处理
//!
//! 将网关错误映射为 HTTP 状态码与 `{data, error, code}` 信封。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use algo_core::error::GatewayError;

use crate::types::Envelope;

/// API 层统一错误
#[derive(Error, Debug)]
pub enum ApiError {
    /// 网关、引擎或传输层错误
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Gateway(err) => match err {
                GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
                GatewayError::UnknownTemplate(_) => StatusCode::NOT_FOUND,
                GatewayError::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
                GatewayError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ApiError::Gateway(err) = self;

        if status.is_server_error() {
            tracing::error!("{}", err);
        } else {
            tracing::warn!("{}", err);
        }

        (status, Json(Envelope::<()>::failure(&err))).into_response()
    }
}

/// 请求体无法解析为目标结构
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Gateway(GatewayError::Validation(rejection.body_text()))
    }
}
