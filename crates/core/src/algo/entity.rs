use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 算法参数表，键为参数名，值为任意 JSON 标量或结构。
///
/// # Invariants
/// - 使用 `BTreeMap` 保证序列化顺序稳定。
pub type AlgoSetting = BTreeMap<String, serde_json::Value>;

/// # Summary
/// 委托方向。
///
/// # Invariants
/// - 序列化为小写 `long` / `short`，同时接受 `buy` / `sell` 别名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "buy")]
    Long,
    #[serde(alias = "sell")]
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            _ => Err(format!("Unknown Direction: {}", s)),
        }
    }
}

/// # Summary
/// 开平方向。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Offset {
    #[default]
    None,
    Open,
    Close,
    #[serde(alias = "close_today")]
    CloseToday,
    #[serde(alias = "close_yesterday")]
    CloseYesterday,
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Offset::None => write!(f, "none"),
            Offset::Open => write!(f, "open"),
            Offset::Close => write!(f, "close"),
            Offset::CloseToday => write!(f, "closetoday"),
            Offset::CloseYesterday => write!(f, "closeyesterday"),
        }
    }
}

impl FromStr for Offset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(Offset::None),
            "open" => Ok(Offset::Open),
            "close" => Ok(Offset::Close),
            "closetoday" | "close_today" => Ok(Offset::CloseToday),
            "closeyesterday" | "close_yesterday" => Ok(Offset::CloseYesterday),
            _ => Err(format!("Unknown Offset: {}", s)),
        }
    }
}

/// # Summary
/// 算法实例在引擎内部的运行状态。
///
/// # Invariants
/// - 进程内参考引擎只产生 `Running` 与 `Stopped`。
/// - `Paused` / `Finished` 供支持暂停或自然结束的外部引擎上报，线上名称与其保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgoStatus {
    Running,
    Paused,
    Stopped,
    Finished,
}

impl AlgoStatus {
    /// 是否仍会响应停止指令 (运行中或暂停中)。
    pub fn is_active(&self) -> bool {
        matches!(self, AlgoStatus::Running | AlgoStatus::Paused)
    }
}

/// # Summary
/// 算法模板，描述一种可被反复实例化的执行算法。
///
/// # Invariants
/// - `template_name` 在引擎注册表内唯一。
/// - 网关只读取模板，所有权归引擎。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlgoTemplate {
    /// 模板名称 (唯一)
    #[schema(example = "TwapAlgo")]
    pub template_name: String,
    /// 显示名称
    #[serde(default)]
    #[schema(example = "TWAP时间加权平均")]
    pub display_name: String,
    /// 默认参数
    #[serde(default)]
    #[schema(value_type = Object)]
    pub default_setting: AlgoSetting,
}

impl AlgoTemplate {
    pub fn new(
        template_name: impl Into<String>,
        display_name: impl Into<String>,
        default_setting: AlgoSetting,
    ) -> Self {
        Self {
            template_name: template_name.into(),
            display_name: display_name.into(),
            default_setting,
        }
    }
}

/// # Summary
/// 启动算法请求，HTTP 请求体与 RPC 参数共用此结构。
///
/// # Invariants
/// - 每次调用构造、分发后即丢弃，不做持久化。
/// - `template_name` 必须在调用时存在于引擎注册表中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StartAlgoRequest {
    /// 算法模板名称
    #[schema(example = "TwapAlgo")]
    pub template_name: String,
    /// 交易标的代码
    #[schema(example = "BTC-USD")]
    pub vt_symbol: String,
    /// 委托方向
    pub direction: Direction,
    /// 开平方向
    pub offset: Offset,
    /// 委托价格
    #[schema(value_type = f64, example = 100.5)]
    pub price: Decimal,
    /// 委托数量
    #[schema(value_type = f64, example = 2)]
    pub volume: Decimal,
    /// 执行间隔 (秒)
    #[schema(example = 30)]
    pub interval: i64,
    /// 执行时长或时间戳
    #[schema(example = 0)]
    pub time: i64,
}
