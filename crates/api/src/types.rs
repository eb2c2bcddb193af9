//! # DTO (Data Transfer Object) 层
//!
//! 面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use algo_core::algo::entity::{AlgoSetting, AlgoTemplate};
use algo_core::error::GatewayError;

// ============================================================
//  通用响应信封
// ============================================================

/// 统一响应信封
///
/// 成功时 `code` 为 0、`error` 为 null；失败时 `code` 非零、`error` 为错误类别名 (如 `UnknownTemplate`)、`data` 为 null。
/// 错误详情只写入服务端日志。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// 数据载荷
    pub data: Option<T>,
    /// 错误类别 (失败时)
    #[schema(example = "UnknownTemplate")]
    pub error: Option<String>,
    /// 0 表示成功
    #[schema(example = 0)]
    pub code: i32,
}

impl<T> Envelope<T> {
    /// 带数据的成功响应
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            code: 0,
        }
    }

    /// 无数据的成功响应
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
            code: 0,
        }
    }

    /// 失败响应
    pub fn failure(err: &GatewayError) -> Self {
        Self {
            data: None,
            error: Some(err.kind().to_string()),
            code: err.code(),
        }
    }
}

// ============================================================
//  算法模板 DTO
// ============================================================

/// 算法模板 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlgoTemplateResponse {
    /// 模板名称
    #[schema(example = "TwapAlgo")]
    pub template_name: String,
    /// 默认参数
    #[schema(value_type = Object)]
    pub default_setting: AlgoSetting,
}

/// 模板列表载荷
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlgoTemplateList {
    pub algo_template: Vec<AlgoTemplateResponse>,
}

impl From<AlgoTemplate> for AlgoTemplateResponse {
    fn from(t: AlgoTemplate) -> Self {
        Self {
            template_name: t.template_name,
            default_setting: t.default_setting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_envelope_shape() {
        let v = serde_json::to_value(Envelope::<()>::empty()).unwrap();
        assert_eq!(v, json!({"data": null, "error": null, "code": 0}));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let err = GatewayError::UnknownTemplate("UNKNOWN".into());
        let v = serde_json::to_value(Envelope::<()>::failure(&err)).unwrap();
        assert_eq!(
            v,
            json!({"data": null, "error": "UnknownTemplate", "code": 2})
        );
    }
}
