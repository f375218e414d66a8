//! Microgrid dashboard CLI
//!
//! Prints the dashboard pages as text tables, or serves them as JSON.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use microgrid_dashboard::model::{AssetDraft, AssetKind, AssetStatus, RecordId, SiteDraft};
use microgrid_dashboard::pages::{load_detail, AssetListPage, LogPage, SiteListPage};
use microgrid_dashboard::settings::{MicrogridSettings, SettingsStore};
use microgrid_dashboard::{connect, load_config, render, Config, DashboardError};
use tracing::Level;

#[derive(Parser)]
#[command(name = "microgrid-dashboard")]
#[command(about = "Solar, wind and battery-log views over a microgrid monitoring backend")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// View server port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve all pages as JSON until ctrl-c
    Serve,
    /// Solar systems
    Solar {
        #[command(subcommand)]
        action: AssetCommand,
    },
    /// Wind turbines
    Wind {
        #[command(subcommand)]
        action: AssetCommand,
    },
    /// Solar site configurations
    Sites {
        #[command(subcommand)]
        action: SiteCommand,
    },
    /// Battery agent decisions
    Logs {
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Microgrid settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Subcommand)]
enum AssetCommand {
    /// List all assets of this kind
    List,
    /// Asset details with measurements and forecasts
    Show { id: String },
    /// Create an asset
    Create(DraftArgs),
    /// Change an asset; omitted fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete an asset
    Delete { id: String },
}

#[derive(ClapArgs)]
struct DraftArgs {
    #[arg(long)]
    name: Option<String>,
    /// Rated power in kW
    #[arg(long)]
    power: Option<f64>,
    /// Panel efficiency in percent
    #[arg(long)]
    efficiency: Option<f64>,
    /// active, inactive or maintenance
    #[arg(long)]
    status: Option<AssetStatus>,
    #[arg(long)]
    location: Option<String>,
}

impl DraftArgs {
    fn apply(self, draft: &mut AssetDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if self.power.is_some() {
            draft.rated_power_kw = self.power;
        }
        if self.efficiency.is_some() {
            draft.efficiency_pct = self.efficiency;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if self.location.is_some() {
            draft.location = self.location;
        }
    }
}

#[derive(Subcommand)]
enum SiteCommand {
    /// List site configurations
    List,
    /// Add a site configuration
    Create(SiteArgs),
    /// Delete a site configuration
    Delete { id: String },
}

#[derive(ClapArgs)]
struct SiteArgs {
    #[arg(long)]
    name: String,
    /// Degrees, -90 to 90
    #[arg(long, allow_hyphen_values = true)]
    latitude: f64,
    /// Degrees, -180 to 180
    #[arg(long, allow_hyphen_values = true)]
    longitude: f64,
    #[arg(long)]
    timezone: Option<String>,
    /// Array tilt in degrees
    #[arg(long)]
    tilt: Option<f64>,
    /// Array azimuth in degrees
    #[arg(long)]
    azimuth: Option<f64>,
    /// Target capacity in kW
    #[arg(long)]
    target_kw: Option<f64>,
    /// Module power at STC in W
    #[arg(long)]
    module_power_stc: Option<f64>,
    #[arg(long)]
    albedo: Option<f64>,
}

impl From<SiteArgs> for SiteDraft {
    fn from(args: SiteArgs) -> Self {
        SiteDraft {
            timezone: args.timezone.unwrap_or_default(),
            tilt: args.tilt,
            azimuth: args.azimuth,
            target_kw: args.target_kw,
            module_power_stc: args.module_power_stc,
            albedo: args.albedo,
            ..SiteDraft::new(args.name, args.latitude, args.longitude)
        }
    }
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change settings; omitted fields keep their current value
    Set(SettingsArgs),
}

#[derive(ClapArgs)]
struct SettingsArgs {
    #[arg(long)]
    battery_capacity_kwh: Option<f64>,
    #[arg(long)]
    max_charge_kw: Option<f64>,
    #[arg(long)]
    max_discharge_kw: Option<f64>,
    #[arg(long)]
    min_soc_pct: Option<f64>,
    #[arg(long)]
    max_soc_pct: Option<f64>,
    #[arg(long)]
    grid_export: Option<bool>,
    #[arg(long)]
    grid_import: Option<bool>,
    /// 15, 30 or 60
    #[arg(long)]
    simulation_step_minutes: Option<u32>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    timezone: Option<String>,
}

impl SettingsArgs {
    fn apply(self, s: &mut MicrogridSettings) {
        s.battery_capacity_kwh = self.battery_capacity_kwh.unwrap_or(s.battery_capacity_kwh);
        s.max_charge_kw = self.max_charge_kw.unwrap_or(s.max_charge_kw);
        s.max_discharge_kw = self.max_discharge_kw.unwrap_or(s.max_discharge_kw);
        s.min_soc_pct = self.min_soc_pct.unwrap_or(s.min_soc_pct);
        s.max_soc_pct = self.max_soc_pct.unwrap_or(s.max_soc_pct);
        s.grid_export_enabled = self.grid_export.unwrap_or(s.grid_export_enabled);
        s.grid_import_enabled = self.grid_import.unwrap_or(s.grid_import_enabled);
        s.simulation_step_minutes = self
            .simulation_step_minutes
            .unwrap_or(s.simulation_step_minutes);
        if let Some(location) = self.location {
            s.location = location;
        }
        if let Some(timezone) = self.timezone {
            s.timezone = timezone;
        }
    }
}

async fn run_assets(
    config: &Config,
    kind: AssetKind,
    action: AssetCommand,
) -> Result<(), DashboardError> {
    let api = connect(config);

    let action = match action {
        AssetCommand::Show { id } => {
            let view = load_detail(&api, &config.pages, kind, &RecordId::from(id)).await;
            print!("{}", render::detail(&view));
            return Ok(());
        }
        action => action,
    };

    let page = AssetListPage::new(kind, api);
    page.mount().await;

    match action {
        AssetCommand::List | AssetCommand::Show { .. } => {}
        AssetCommand::Create(fields) => {
            let mut draft = AssetDraft::default();
            fields.apply(&mut draft);
            let created = page.create(&draft).await?;
            println!("Created {} {}", kind.label(), created.id);
        }
        AssetCommand::Update { id, fields } => {
            let id = RecordId::from(id);
            let current = page.get(&id).await.ok_or_else(|| {
                DashboardError::NotFound(format!("{} {}", kind.label(), id))
            })?;
            let mut draft = AssetDraft::from_asset(&current);
            fields.apply(&mut draft);
            page.update(&id, &draft).await?;
            println!("Updated {} {}", kind.label(), id);
        }
        AssetCommand::Delete { id } => {
            let id = RecordId::from(id);
            page.delete(&id).await?;
            println!("Deleted {} {}", kind.label(), id);
        }
    }

    print!(
        "{}",
        render::asset_table(
            kind,
            &page.assets().await,
            &page.status().await,
            page.total_active_power_kw().await
        )
    );
    Ok(())
}

async fn run_sites(config: &Config, action: SiteCommand) -> Result<(), DashboardError> {
    let page = SiteListPage::new(connect(config));
    page.mount().await;

    match action {
        SiteCommand::List => {}
        SiteCommand::Create(args) => {
            let created = page.create(&SiteDraft::from(args)).await?;
            println!("Created site configuration {}", created.id);
        }
        SiteCommand::Delete { id } => {
            let id = RecordId::from(id);
            page.delete(&id).await?;
            println!("Deleted site configuration {}", id);
        }
    }

    print!(
        "{}",
        render::site_table(&page.sites().await, &page.status().await)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, backend_url={:?}, port={:?}, log_level={:?}",
        args.config,
        args.backend_url,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(backend_url) = args.backend_url {
        config.backend.base_url = backend_url;
    }
    if let Some(port) = args.port {
        config.view_server.port = port;
    }
    config.validate()?;

    match args.command {
        Command::Serve => {
            tracing::info!("Starting microgrid dashboard");
            microgrid_dashboard::run(config).await?;
        }
        Command::Solar { action } => run_assets(&config, AssetKind::Solar, action).await?,
        Command::Wind { action } => run_assets(&config, AssetKind::Wind, action).await?,
        Command::Sites { action } => run_sites(&config, action).await?,
        Command::Logs { page } => {
            let mut logs = LogPage::new(connect(&config), config.pages.rows_per_page);
            logs.mount().await;
            logs.set_page(page);
            print!("{}", render::log_table(&logs.view()));
        }
        Command::Settings { action } => {
            let mut store = SettingsStore::open(config.settings_path.clone())?;
            if let SettingsCommand::Set(fields) = action {
                let mut settings = store.current().clone();
                fields.apply(&mut settings);
                store.update(settings)?;
                if config.settings_path.is_none() {
                    tracing::warn!("No settings_path configured, change not persisted");
                }
            }
            print!("{}", render::settings(store.current()));
        }
    }

    Ok(())
}
