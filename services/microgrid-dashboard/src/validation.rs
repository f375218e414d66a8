//! Form validation
//!
//! A [`RuleSet`] is checked against any [`FormPayload`] and yields a [`FieldErrors`]
//! mapping. An empty mapping means the payload may be submitted.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{DashboardError, Result};

/// Field name to message, one entry per invalid field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing failed, otherwise a [`DashboardError::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// The value a form holds for one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
}

/// Anything a rule set can inspect field by field
pub trait FormPayload {
    /// `None` when the payload has no such field at all.
    fn value(&self, field: &str) -> Option<FieldValue<'_>>;
}

/// A single constraint. Numeric checks pass when the number is absent;
/// pair them with [`Check::Required`] to demand a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Required,
    AtLeast(f64),
    GreaterThan(f64),
    Range(f64, f64),
    OneOf(Vec<f64>),
}

impl Check {
    fn passes(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Check::Required, FieldValue::Text(s)) => !s.trim().is_empty(),
            (Check::Required, FieldValue::Number(n)) => n.is_some(),
            (_, FieldValue::Text(_)) | (_, FieldValue::Number(None)) => true,
            (Check::AtLeast(min), FieldValue::Number(Some(v))) => v >= *min,
            (Check::GreaterThan(min), FieldValue::Number(Some(v))) => v > *min,
            (Check::Range(lo, hi), FieldValue::Number(Some(v))) => (*lo..=*hi).contains(&v),
            (Check::OneOf(allowed), FieldValue::Number(Some(v))) => allowed.contains(&v),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    field: &'static str,
    check: Check,
    message: String,
}

/// Ordered list of rules; only the first failing rule of a field is reported
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: &'static str, check: Check, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            field,
            check,
            message: message.into(),
        });
        self
    }

    pub fn validate<P: FormPayload + ?Sized>(&self, payload: &P) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for rule in &self.rules {
            if errors.contains(rule.field) {
                continue;
            }
            let Some(value) = payload.value(rule.field) else {
                continue;
            };
            if !rule.check.passes(value) {
                errors.insert(rule.field, rule.message.clone());
            }
        }
        errors
    }
}

/// Rules for solar system and wind turbine forms
pub fn asset_rules() -> RuleSet {
    RuleSet::new()
        .rule("name", Check::Required, "Name is required")
        .rule("power", Check::Required, "Power is required")
        .rule("power", Check::GreaterThan(0.0), "Power must be greater than 0")
        .rule(
            "efficiency",
            Check::Range(0.0, 100.0),
            "Efficiency must be between 0 and 100",
        )
}

/// Rules for the microgrid settings form
pub fn settings_rules() -> RuleSet {
    RuleSet::new()
        .rule(
            "battery_capacity_kwh",
            Check::AtLeast(1.0),
            "Battery capacity must be at least 1 kWh",
        )
        .rule(
            "max_charge_kw",
            Check::AtLeast(0.0),
            "Charge power cannot be negative",
        )
        .rule(
            "max_discharge_kw",
            Check::AtLeast(0.0),
            "Discharge power cannot be negative",
        )
        .rule(
            "min_soc_pct",
            Check::Range(0.0, 100.0),
            "Minimum SoC must be between 0 and 100",
        )
        .rule(
            "max_soc_pct",
            Check::Range(0.0, 100.0),
            "Maximum SoC must be between 0 and 100",
        )
        .rule(
            "simulation_step_minutes",
            Check::OneOf(vec![15.0, 30.0, 60.0]),
            "Simulation step must be 15, 30 or 60 minutes",
        )
        .rule("location", Check::Required, "Location is required")
}

/// Rules for the solar site configuration form
pub fn site_rules() -> RuleSet {
    RuleSet::new()
        .rule("name", Check::Required, "Name is required")
        .rule("latitude", Check::Required, "Latitude is required")
        .rule(
            "latitude",
            Check::Range(-90.0, 90.0),
            "Latitude must be between -90 and 90",
        )
        .rule("longitude", Check::Required, "Longitude is required")
        .rule(
            "longitude",
            Check::Range(-180.0, 180.0),
            "Longitude must be between -180 and 180",
        )
        .rule("tilt", Check::Range(0.0, 90.0), "Tilt must be between 0 and 90")
        .rule(
            "azimuth",
            Check::Range(0.0, 360.0),
            "Azimuth must be between 0 and 360",
        )
        .rule(
            "target_kw",
            Check::GreaterThan(0.0),
            "Target power must be greater than 0",
        )
        .rule(
            "module_power_stc",
            Check::GreaterThan(0.0),
            "Module power must be greater than 0",
        )
        .rule("albedo", Check::Range(0.0, 1.0), "Albedo must be between 0 and 1")
}
