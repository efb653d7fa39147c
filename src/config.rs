use crate::calendar::MonthTable;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Average number of days in a month, used to turn daily costs into a monthly figure.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

/// Average number of weeks in a month, used to turn weekly costs into a monthly figure.
pub const AVERAGE_WEEKS_PER_MONTH: f64 = 4.33;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub month_table: MonthTable,
    pub days_per_month: f64,
    pub weeks_per_month: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            month_table: MonthTable::default(),
            days_per_month: AVERAGE_DAYS_PER_MONTH,
            weeks_per_month: AVERAGE_WEEKS_PER_MONTH,
        }
    }
}

impl EngineConfig {
    pub fn with_month_table(mut self, month_table: MonthTable) -> Self {
        self.month_table = month_table;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "days_per_month": 30.0 }"#).unwrap();
        assert_eq!(config.days_per_month, 30.0);
        assert_eq!(config.weeks_per_month, AVERAGE_WEEKS_PER_MONTH);
        assert_eq!(config.month_table, MonthTable::russian());
    }

    #[test]
    fn test_with_month_table() {
        let config = EngineConfig::default().with_month_table(MonthTable::english());
        assert_eq!(config.month_table.index_of("April"), 3);
    }
}
