//! Historical decision records from the microgrid controller

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{de_opt_number, de_opt_timestamp, RecordId};

/// Battery action taken for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatteryAction {
    Charge,
    Discharge,
    Idle,
    Other(String),
}

impl From<String> for BatteryAction {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "charge" => BatteryAction::Charge,
            "discharge" => BatteryAction::Discharge,
            "idle" => BatteryAction::Idle,
            _ => BatteryAction::Other(raw),
        }
    }
}

impl From<BatteryAction> for String {
    fn from(action: BatteryAction) -> Self {
        match action {
            BatteryAction::Charge => "charge".to_string(),
            BatteryAction::Discharge => "discharge".to_string(),
            BatteryAction::Idle => "idle".to_string(),
            BatteryAction::Other(raw) => raw,
        }
    }
}

impl BatteryAction {
    pub fn label(&self) -> &str {
        match self {
            BatteryAction::Charge => "Charging",
            BatteryAction::Discharge => "Discharging",
            BatteryAction::Idle => "Idle",
            BatteryAction::Other(raw) => raw,
        }
    }
}

impl fmt::Display for BatteryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Colour class for the reward cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardSign {
    Positive,
    Negative,
    Zero,
}

impl RewardSign {
    pub fn of(reward: f64) -> Self {
        if reward > 0.0 {
            RewardSign::Positive
        } else if reward < 0.0 {
            RewardSign::Negative
        } else {
            RewardSign::Zero
        }
    }
}

/// Placeholder for a missing numeric cell
pub const MISSING: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub solar_ac: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub wind_ac: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub load: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub soc: Option<f64>,
    #[serde(default = "default_action")]
    pub action: BatteryAction,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub reward: Option<f64>,
}

fn default_action() -> BatteryAction {
    BatteryAction::Idle
}

impl LogRow {
    pub fn time_label(&self) -> String {
        self.timestamp
            .map(|ts| ts.format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_else(|| MISSING.to_string())
    }

    pub fn soc_label(&self) -> String {
        self.soc
            .map(|soc| format!("{:.1}%", soc * 100.0))
            .unwrap_or_else(|| MISSING.to_string())
    }

    pub fn reward_label(&self) -> String {
        match self.reward {
            Some(r) if r > 0.0 => format!("+{:.2}", r),
            Some(r) => format!("{:.2}", r),
            None => MISSING.to_string(),
        }
    }

    pub fn reward_sign(&self) -> RewardSign {
        RewardSign::of(self.reward.unwrap_or(0.0))
    }
}

/// Format an optional kW cell with two decimals.
pub fn kw_cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| MISSING.to_string())
}

/// Newest first; rows without a timestamp go last.
pub fn sort_newest_first(rows: &mut [LogRow]) {
    rows.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: &str) -> LogRow {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_string_numbers() {
        let r = row(
            r#"{"id": 4, "timestamp": "2025-12-16T07:00:00Z", "solar_ac": "3.40",
                "wind_ac": 9.1, "load": "12.00", "soc": 0.5, "action": "idle", "reward": "-0.20"}"#,
        );
        assert_eq!(r.solar_ac, Some(3.4));
        assert_eq!(r.load, Some(12.0));
        assert_eq!(r.action, BatteryAction::Idle);
        assert_eq!(r.reward_sign(), RewardSign::Negative);
        assert_eq!(r.reward_label(), "-0.20");
    }

    #[test]
    fn labels_cover_missing_values() {
        let r = row(r#"{"id": 1, "action": "hold"}"#);
        assert_eq!(r.action.label(), "hold");
        assert_eq!(r.soc_label(), MISSING);
        assert_eq!(r.reward_label(), MISSING);
        assert_eq!(r.time_label(), MISSING);
        assert_eq!(kw_cell(r.solar_ac), MISSING);
        assert_eq!(r.reward_sign(), RewardSign::Zero);
    }

    #[test]
    fn positive_reward_and_soc_formatting() {
        let r = row(
            r#"{"id": 1, "timestamp": "2025-12-16T10:00:00Z", "soc": 0.78,
                "action": "discharge", "reward": 0.92}"#,
        );
        assert_eq!(r.reward_label(), "+0.92");
        assert_eq!(r.soc_label(), "78.0%");
        assert_eq!(r.action.label(), "Discharging");
        assert_eq!(r.time_label(), "16.12.2025 10:00");
    }

    #[test]
    fn action_round_trips_through_wire_text() {
        let json = serde_json::to_string(&BatteryAction::Charge).unwrap();
        assert_eq!(json, r#""charge""#);
    }

    #[test]
    fn newest_first_with_undated_last() {
        let mut rows = vec![
            row(r#"{"id": 1, "timestamp": "2025-12-16T08:00:00Z"}"#),
            row(r#"{"id": 2}"#),
            row(r#"{"id": 3, "timestamp": "2025-12-16T10:00:00Z"}"#),
        ];
        sort_newest_first(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }
}
