//! # 算法参数合并
//!
//! 模板默认参数与调用方参数的不可变合并。

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use super::entity::{AlgoSetting, Direction, Offset, StartAlgoRequest};

/// 标识委托本身的字段，由引擎以独立参数接收，不属于算法私有参数。
pub const IDENTITY_KEYS: [&str; 5] = ["vt_symbol", "direction", "offset", "price", "volume"];

/// # Summary
/// 调用方提供的覆盖参数。
///
/// # Invariants
/// - 标识字段总是覆盖默认值。
/// - `interval` / `time` 只覆盖模板已声明的同名参数。
#[derive(Debug, Clone, PartialEq)]
pub struct SettingOverrides {
    pub vt_symbol: String,
    pub direction: Direction,
    pub offset: Offset,
    pub price: Decimal,
    pub volume: Decimal,
    pub interval: Option<i64>,
    pub time: Option<i64>,
}

impl From<&StartAlgoRequest> for SettingOverrides {
    fn from(req: &StartAlgoRequest) -> Self {
        Self {
            vt_symbol: req.vt_symbol.clone(),
            direction: req.direction,
            offset: req.offset,
            price: req.price,
            volume: req.volume,
            interval: Some(req.interval),
            time: Some(req.time),
        }
    }
}

/// # Summary
/// 合并模板默认参数与调用方参数，返回新的参数表。
///
/// # Logic
/// 1. 克隆默认参数。
/// 2. 写入五个标识字段。
/// 3. 对模板已声明的 `interval` / `time` 写入调用方的值。
///
/// # Arguments
/// * `defaults` - 模板默认参数，不会被修改。
/// * `overrides` - 调用方参数，不会被修改。
///
/// # Returns
/// * `AlgoSetting` - 合并后的完整参数表。
pub fn merge(defaults: &AlgoSetting, overrides: &SettingOverrides) -> AlgoSetting {
    let mut merged = defaults.clone();

    merged.insert("vt_symbol".to_string(), Value::from(overrides.vt_symbol.clone()));
    merged.insert("direction".to_string(), Value::from(overrides.direction.to_string()));
    merged.insert("offset".to_string(), Value::from(overrides.offset.to_string()));
    merged.insert("price".to_string(), decimal_value(overrides.price));
    merged.insert("volume".to_string(), decimal_value(overrides.volume));

    for (key, value) in [("interval", overrides.interval), ("time", overrides.time)] {
        if let Some(v) = value.filter(|_| merged.contains_key(key)) {
            merged.insert(key.to_string(), Value::from(v));
        }
    }

    merged
}

/// # Summary
/// 去掉标识字段后的算法私有参数。
pub fn algo_parameters(setting: &AlgoSetting) -> AlgoSetting {
    setting
        .iter()
        .filter(|(k, _)| !IDENTITY_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// JSON 数值没有定点小数，与请求体的编码保持一致
fn decimal_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return Value::from(i);
        }
    }
    d.to_f64().map(Value::from).unwrap_or(Value::Null)
}
