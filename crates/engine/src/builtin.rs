use algo_core::algo::entity::{AlgoSetting, AlgoTemplate};
use serde_json::json;

/// # Summary
/// 内置算法模板及其默认参数。
///
/// # Returns
/// * `Vec<AlgoTemplate>` - TWAP、冰山、狙击手、条件委托、最优限价。
pub fn builtin_templates() -> Vec<AlgoTemplate> {
    vec![
        AlgoTemplate::new(
            "TwapAlgo",
            "TWAP时间加权平均",
            setting(&[("time", json!(600)), ("interval", json!(60))]),
        ),
        AlgoTemplate::new(
            "IcebergAlgo",
            "冰山",
            setting(&[("display_volume", json!(0.0)), ("interval", json!(0))]),
        ),
        AlgoTemplate::new("SniperAlgo", "狙击手", AlgoSetting::new()),
        AlgoTemplate::new("StopAlgo", "条件委托", setting(&[("price_add", json!(0.0))])),
        AlgoTemplate::new(
            "BestLimitAlgo",
            "最优限价",
            setting(&[("min_volume", json!(0.0)), ("max_volume", json!(0.0))]),
        ),
    ]
}

fn setting(pairs: &[(&str, serde_json::Value)]) -> AlgoSetting {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_names_unique() {
        let templates = builtin_templates();
        let names: HashSet<_> = templates.iter().map(|t| t.template_name.as_str()).collect();
        assert_eq!(names.len(), templates.len());
        assert!(names.contains("TwapAlgo"));
    }
}
