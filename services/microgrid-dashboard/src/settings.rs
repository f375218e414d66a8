//! Microgrid settings: battery limits, grid exchange and simulation step

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::validation::{settings_rules, FieldErrors, FieldValue, FormPayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicrogridSettings {
    pub battery_capacity_kwh: f64,
    pub max_charge_kw: f64,
    pub max_discharge_kw: f64,
    pub min_soc_pct: f64,
    pub max_soc_pct: f64,
    pub grid_export_enabled: bool,
    pub grid_import_enabled: bool,
    pub simulation_step_minutes: u32,
    pub location: String,
    pub timezone: String,
}

impl Default for MicrogridSettings {
    fn default() -> Self {
        Self {
            battery_capacity_kwh: 50.0,
            max_charge_kw: 10.0,
            max_discharge_kw: 15.0,
            min_soc_pct: 20.0,
            max_soc_pct: 95.0,
            grid_export_enabled: true,
            grid_import_enabled: true,
            simulation_step_minutes: 60,
            location: "Караганда, Казахстан".to_string(),
            timezone: "Asia/Almaty".to_string(),
        }
    }
}

impl FormPayload for MicrogridSettings {
    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let number = |v: f64| Some(FieldValue::Number(Some(v)));
        match field {
            "battery_capacity_kwh" => number(self.battery_capacity_kwh),
            "max_charge_kw" => number(self.max_charge_kw),
            "max_discharge_kw" => number(self.max_discharge_kw),
            "min_soc_pct" => number(self.min_soc_pct),
            "max_soc_pct" => number(self.max_soc_pct),
            "simulation_step_minutes" => number(f64::from(self.simulation_step_minutes)),
            "location" => Some(FieldValue::Text(&self.location)),
            "timezone" => Some(FieldValue::Text(&self.timezone)),
            _ => None,
        }
    }
}

impl MicrogridSettings {
    /// Field rules plus the SoC ordering constraint
    pub fn validate(&self) -> FieldErrors {
        let mut errors = settings_rules().validate(self);
        if !errors.contains("min_soc_pct")
            && !errors.contains("max_soc_pct")
            && self.min_soc_pct > self.max_soc_pct
        {
            errors.insert(
                "min_soc_pct",
                "Minimum SoC cannot exceed maximum SoC",
            );
        }
        errors
    }

    /// Usable battery energy between the SoC bounds
    pub fn usable_capacity_kwh(&self) -> f64 {
        self.battery_capacity_kwh * (self.max_soc_pct - self.min_soc_pct).max(0.0) / 100.0
    }
}

/// Read settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<MicrogridSettings> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file at {:?}, using defaults", path);
            Ok(MicrogridSettings::default())
        }
        Err(e) => Err(DashboardError::Config(format!(
            "Failed to read settings file {:?}: {}",
            path, e
        ))),
    }
}

/// Validate, then write as pretty JSON. Nothing is written when validation fails.
pub fn save_settings(path: &Path, settings: &MicrogridSettings) -> Result<()> {
    settings.validate().into_result()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(settings)?)?;
    tracing::info!("Saved settings to {:?}", path);
    Ok(())
}

/// Current settings, persisted on every accepted change when a path is set
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: MicrogridSettings,
}

impl SettingsStore {
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let current = match &path {
            Some(p) => load_settings(p)?,
            None => MicrogridSettings::default(),
        };
        Ok(Self { path, current })
    }

    pub fn current(&self) -> &MicrogridSettings {
        &self.current
    }

    /// Replace the settings if they validate (and persist, when backed by a file).
    pub fn update(&mut self, settings: MicrogridSettings) -> Result<()> {
        match &self.path {
            Some(path) => save_settings(path, &settings)?,
            None => settings.validate().into_result()?,
        }
        self.current = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = MicrogridSettings::default();
        assert!(settings.validate().is_empty());
        assert_eq!(settings.simulation_step_minutes, 60);
        assert_eq!(settings.timezone, "Asia/Almaty");
        assert!((settings.usable_capacity_kwh() - 37.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_values() {
        let settings = MicrogridSettings {
            battery_capacity_kwh: 0.5,
            max_charge_kw: -1.0,
            max_soc_pct: 120.0,
            simulation_step_minutes: 45,
            location: "  ".to_string(),
            ..Default::default()
        };
        let errors = settings.validate();
        for field in [
            "battery_capacity_kwh",
            "max_charge_kw",
            "max_soc_pct",
            "simulation_step_minutes",
            "location",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("min_soc_pct"));
    }

    #[test]
    fn min_soc_above_max_is_rejected() {
        let settings = MicrogridSettings {
            min_soc_pct: 90.0,
            max_soc_pct: 80.0,
            ..Default::default()
        };
        let errors = settings.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("min_soc_pct"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: MicrogridSettings =
            serde_json::from_str(r#"{"battery_capacity_kwh": 80, "grid_export_enabled": false}"#)
                .unwrap();
        assert_eq!(settings.battery_capacity_kwh, 80.0);
        assert!(!settings.grid_export_enabled);
        assert_eq!(settings.max_discharge_kw, 15.0);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, MicrogridSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = MicrogridSettings {
            simulation_step_minutes: 15,
            ..Default::default()
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_settings_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = MicrogridSettings {
            simulation_step_minutes: 7,
            ..Default::default()
        };
        let err = save_settings(&path, &settings).unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
        assert!(!path.exists());
    }

    #[test]
    fn store_keeps_previous_on_rejection() {
        let mut store = SettingsStore::open(None).unwrap();
        let bad = MicrogridSettings {
            battery_capacity_kwh: 0.0,
            ..Default::default()
        };
        assert!(store.update(bad).is_err());
        assert_eq!(store.current(), &MicrogridSettings::default());

        let good = MicrogridSettings {
            max_charge_kw: 12.0,
            ..Default::default()
        };
        store.update(good.clone()).unwrap();
        assert_eq!(store.current(), &good);
    }

    #[test]
    fn load_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_settings(&path), Err(DashboardError::Json(_))));
    }
}
