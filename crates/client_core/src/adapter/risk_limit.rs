use shared::protocol::RiskLimitJson;

pub const DEFAULT_RISK_LIMIT: f64 = 0.05;
pub const MIN_RISK_LIMIT: f64 = 0.0001;
pub const MAX_RISK_LIMIT: f64 = 0.9999;

pub fn format(risk_limit: f64) -> RiskLimitJson {
    RiskLimitJson { risk_limit }
}

pub fn parse(json: &RiskLimitJson) -> f64 {
    json.risk_limit
}

pub fn is_in_range(risk_limit: f64) -> bool {
    risk_limit.is_finite() && (MIN_RISK_LIMIT..=MAX_RISK_LIMIT).contains(&risk_limit)
}

pub fn to_percent(risk_limit: f64) -> f64 {
    risk_limit * 100.0
}

pub fn from_percent(percent: f64) -> f64 {
    percent / 100.0
}
