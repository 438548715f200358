use serde::{Deserialize, Serialize};

/// User preferences and the default reporting windows applied when a caller
/// omits a parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_recent_expenses_limit")]
    pub recent_expenses_limit: usize,
    #[serde(default = "Config::default_chart_months")]
    pub chart_months: u32,
    #[serde(default = "Config::default_trend_months")]
    pub trend_months: u32,
    #[serde(default = "Config::default_daily_spending_days")]
    pub daily_spending_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            recent_expenses_limit: Self::default_recent_expenses_limit(),
            chart_months: Self::default_chart_months(),
            trend_months: Self::default_trend_months(),
            daily_spending_days: Self::default_daily_spending_days(),
        }
    }
}

impl Config {
    pub fn default_recent_expenses_limit() -> usize {
        10
    }

    pub fn default_chart_months() -> u32 {
        3
    }

    pub fn default_trend_months() -> u32 {
        6
    }

    pub fn default_daily_spending_days() -> u32 {
        14
    }
}
