//! Solar panels installed in a solar system

use serde::{Deserialize, Serialize};

use super::{de_opt_number, round2, AssetStatus, RecordId};

/// One panel of a solar system, power in kW
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarPanel {
    pub id: RecordId,
    pub system_id: Option<RecordId>,
    pub power_kw: f64,
    pub status: AssetStatus,
}

impl SolarPanel {
    pub fn is_active(&self) -> bool {
        self.status == AssetStatus::Active
    }
}

/// `GET solar_panels/` item
#[derive(Debug, Deserialize)]
pub struct SolarPanelRecord {
    pub id: RecordId,
    #[serde(default)]
    pub system_id: Option<RecordId>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub power: Option<f64>,
    #[serde(default)]
    pub status: Option<AssetStatus>,
}

impl From<SolarPanelRecord> for SolarPanel {
    fn from(record: SolarPanelRecord) -> Self {
        SolarPanel {
            id: record.id,
            system_id: record.system_id,
            power_kw: record.power.unwrap_or(0.0),
            status: record.status.unwrap_or_default(),
        }
    }
}

/// Power of the active panels, rounded for display
pub fn active_panel_power_kw(panels: &[SolarPanel]) -> f64 {
    round2(
        panels
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.power_kw)
            .sum(),
    )
}
