//! BDD step definitions for the microgrid dashboard

pub mod asset_steps;
pub mod chart_steps;
pub mod log_steps;
pub mod validation_steps;
