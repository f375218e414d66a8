//! Synthetic overview statistics
//!
//! The overview page shows generation, load and battery figures that change on a
//! timer. [`StatsTicker`] owns that timer as a background task: it is started when
//! the page mounts and cancelled when the page is torn down or dropped.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::StatsConfig;
use crate::model::round2;

/// Instantaneous microgrid figures; powers in kW, `soc` as a 0..1 fraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub solar_kw: f64,
    pub wind_kw: f64,
    pub load_kw: f64,
    pub soc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLabel {
    Surplus,
    Deficit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryLevel {
    High,
    Medium,
    Low,
}

impl GridSnapshot {
    pub fn initial() -> Self {
        Self {
            solar_kw: 5.2,
            wind_kw: 3.8,
            load_kw: 7.1,
            soc: 0.72,
        }
    }

    pub fn total_generation_kw(&self) -> f64 {
        self.solar_kw + self.wind_kw
    }

    /// Generation minus load
    pub fn balance_kw(&self) -> f64 {
        self.total_generation_kw() - self.load_kw
    }

    /// An exact balance counts as a deficit.
    pub fn balance_label(&self) -> BalanceLabel {
        if self.balance_kw() > 0.0 {
            BalanceLabel::Surplus
        } else {
            BalanceLabel::Deficit
        }
    }

    pub fn battery_level(&self) -> BatteryLevel {
        if self.soc > 0.7 {
            BatteryLevel::High
        } else if self.soc > 0.3 {
            BatteryLevel::Medium
        } else {
            BatteryLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Charge,
    Discharge,
    Solar,
    Wind,
    Info,
}

impl EventKind {
    const ALL: [EventKind; 5] = [
        EventKind::Charge,
        EventKind::Discharge,
        EventKind::Solar,
        EventKind::Wind,
        EventKind::Info,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            EventKind::Charge => "Agent: charging battery",
            EventKind::Discharge => "Agent: discharging battery (high load)",
            EventKind::Solar => "Solar generation changed",
            EventKind::Wind => "Wind generation changed",
            EventKind::Info => "System stable",
        }
    }
}

/// Entry in the overview event feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridEvent {
    pub time: String,
    pub message: String,
    pub kind: EventKind,
}

impl GridEvent {
    fn new(time: &str, message: &str, kind: EventKind) -> Self {
        Self {
            time: time.to_string(),
            message: message.to_string(),
            kind,
        }
    }
}

/// Everything the overview shows besides the charts; events newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub snapshot: GridSnapshot,
    pub events: Vec<GridEvent>,
    pub tick: u64,
}

impl OverviewStats {
    pub fn initial() -> Self {
        Self {
            snapshot: GridSnapshot::initial(),
            events: [
                ("14:15", "Agent: started charging battery (+4.2 kW)", EventKind::Charge),
                ("13:50", "Solar generation up to 6.1 kW", EventKind::Solar),
                ("13:20", "Load rose to 8.3 kW, discharging battery", EventKind::Discharge),
                ("12:45", "Wind: 4.8 kW (steady)", EventKind::Wind),
                ("12:00", "System balanced. SoC: 78%", EventKind::Info),
            ]
            .into_iter()
            .map(|(time, message, kind)| GridEvent::new(time, message, kind))
            .collect(),
            tick: 0,
        }
    }
}

/// Probability that a tick also emits an event
const EVENT_PROBABILITY: f64 = 0.3;
const SOC_STEP: f64 = 0.04;
const SOC_MIN: f64 = 0.1;
const SOC_MAX: f64 = 0.95;

/// One tick: fresh generation and load, a bounded SoC walk, maybe one new event.
pub fn advance<R: Rng>(
    prev: &OverviewStats,
    rng: &mut R,
    time_label: &str,
    event_capacity: usize,
) -> OverviewStats {
    let soc_delta = rng.gen_range(-SOC_STEP..SOC_STEP);
    let snapshot = GridSnapshot {
        solar_kw: round2(rng.gen_range(1.0..8.0)),
        wind_kw: round2(rng.gen_range(1.0..7.0)),
        load_kw: round2(rng.gen_range(6.0..10.0)),
        soc: round2((prev.snapshot.soc + soc_delta).clamp(SOC_MIN, SOC_MAX)),
    };

    let mut events = prev.events.clone();
    if rng.gen_bool(EVENT_PROBABILITY) {
        let kind = EventKind::ALL[rng.gen_range(0..EventKind::ALL.len())];
        events.insert(0, GridEvent::new(time_label, kind.message(), kind));
    }
    events.truncate(event_capacity);

    OverviewStats {
        snapshot,
        events,
        tick: prev.tick + 1,
    }
}

/// Background task publishing [`OverviewStats`] on a fixed interval
#[derive(Debug)]
pub struct StatsTicker {
    rx: watch::Receiver<OverviewStats>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StatsTicker {
    /// Must be called inside a tokio runtime.
    pub fn start(config: &StatsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::start_with(
            Duration::from_secs(config.interval_seconds),
            rng,
            config.event_capacity,
        )
    }

    pub fn start_with(interval: Duration, mut rng: StdRng, event_capacity: usize) -> Self {
        let (tx, rx) = watch::channel(OverviewStats::initial());
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            tracing::debug!("Stats ticker started ({:?})", interval);
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = token.cancelled() => {
                        tracing::debug!("Stats ticker cancelled");
                        break;
                    }
                }

                let label = chrono::Local::now().format("%H:%M").to_string();
                let next = advance(&tx.borrow(), &mut rng, &label, event_capacity);
                tx.send_replace(next);
            }
        });

        Self {
            rx,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<OverviewStats> {
        self.rx.clone()
    }

    pub fn latest(&self) -> OverviewStats {
        self.rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Stats ticker task failed: {}", e);
            }
        }
    }
}

impl Drop for StatsTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
