//! BDD step definitions for form validation

use cucumber::{then, when};

use microgrid_dashboard::model::AssetDraft;
use microgrid_dashboard::settings::MicrogridSettings;
use microgrid_dashboard::validation::asset_rules;

use crate::world::DashboardWorld;

fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.parse().expect("bad number"))
    }
}

#[when(expr = "an asset form with name {string}, power {string} and efficiency {string} is submitted")]
fn submit_asset_form(
    world: &mut DashboardWorld,
    name: String,
    power: String,
    efficiency: String,
) {
    let draft = AssetDraft {
        name,
        rated_power_kw: parse_number(&power),
        efficiency_pct: parse_number(&efficiency),
        ..Default::default()
    };
    world.field_errors = Some(asset_rules().validate(&draft));
}

#[when(expr = "settings with minimum SoC {float}% and maximum SoC {float}% are submitted")]
fn settings_with_soc(world: &mut DashboardWorld, min: f64, max: f64) {
    let settings = MicrogridSettings {
        min_soc_pct: min,
        max_soc_pct: max,
        ..Default::default()
    };
    world.field_errors = Some(settings.validate());
}

#[when(expr = "settings with a simulation step of {int} minutes are submitted")]
fn submit_step(world: &mut DashboardWorld, minutes: u32) {
    let settings = MicrogridSettings {
        simulation_step_minutes: minutes,
        ..Default::default()
    };
    world.field_errors = Some(settings.validate());
}

#[then(expr = "the form reports {string} for {string}")]
fn form_reports(world: &mut DashboardWorld, message: String, field: String) {
    let errors = world.field_errors.as_ref().expect("nothing validated");
    assert_eq!(errors.get(&field), Some(message.as_str()), "errors: {}", errors);
}

#[then(expr = "the form has no error for {string}")]
fn form_has_no_error(world: &mut DashboardWorld, field: String) {
    let errors = world.field_errors.as_ref().expect("nothing validated");
    assert!(!errors.contains(&field), "errors: {}", errors);
}

#[then("the form is valid")]
fn form_is_valid(world: &mut DashboardWorld) {
    let errors = world.field_errors.as_ref().expect("nothing validated");
    assert!(errors.is_empty(), "errors: {}", errors);
}
