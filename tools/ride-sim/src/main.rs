use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use companion_core::alerts::TracingSink;
use companion_core::clock::{Clock, SystemClock};
use companion_core::location::{FixedPosition, GeolocationProvider, LocationError, UserLocation};
use companion_core::session::{DEFAULT_TICK_PERIOD, run_session};
use companion_core::settings::Theme;
use companion_core::simulation::RngMotion;
use companion_core::storage::{KeyValueStore, MemoryStore, Preferences, SqliteStore};
use companion_core::Session;
use companion_transit::prelude::*;
use eyre::{Result, WrapErr, bail};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{Level, info, warn};
use tracing_subscriber::{filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for a position fix
const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(
    name = "ride-sim",
    author,
    version,
    about = "Run a simulated rider session against a bus network",
    long_about = "Moves simulated buses along their lines once per tick and prints \
                  the terminal, delay, proximity and schedule alerts a rider would \
                  receive. Preferences persist across runs when --db is given."
)]
struct Args {
    /// Seconds between ticks
    #[arg(long, default_value_t = DEFAULT_TICK_PERIOD.as_secs())]
    tick_seconds: u64,

    /// Stop after this many ticks (runs until Ctrl-C otherwise)
    #[arg(short = 'n', long)]
    ticks: Option<u64>,

    /// Seed for the motion random source
    #[arg(long)]
    seed: Option<u64>,

    /// Line id to track for proximity alerts
    #[arg(short, long)]
    line: Option<String>,

    /// Proximity window in stops
    #[arg(long)]
    stops_away: Option<u32>,

    /// Fire every schedule, enabled or not
    #[arg(long)]
    auto_notifications: bool,

    /// Rider latitude (with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Rider longitude (with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Use the named stop as the rider's location
    #[arg(long, conflicts_with = "lat")]
    at_stop: Option<String>,

    #[arg(long)]
    theme: Option<Theme>,

    /// JSON array of lines to use instead of the bundled network
    #[arg(short, long)]
    topology: Option<PathBuf>,

    /// SQLite file for persisted preferences
    #[arg(long)]
    db: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let max = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = FilterFn::new(move |meta| {
        let module = meta.module_path().unwrap_or_default();
        (module.starts_with("companion") || module.starts_with("ride_sim")) && *meta.level() <= max
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn load_topology(path: Option<&PathBuf>) -> Result<StaticTopology> {
    let Some(path) = path else {
        return Ok(StaticTopology::seed());
    };

    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    let topology = StaticTopology::from_json(&json)
        .wrap_err_with(|| format!("loading topology from {}", path.display()))?;

    info!(lines = topology.lines().len(), "loaded topology");
    Ok(topology)
}

fn open_store(path: Option<&PathBuf>) -> Result<Box<dyn KeyValueStore>> {
    let store: Box<dyn KeyValueStore> = match path {
        Some(path) => Box::new(SqliteStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };
    Ok(store)
}

async fn locate(provider: &dyn GeolocationProvider) -> Result<UserLocation, LocationError> {
    tokio::time::timeout(LOCATION_TIMEOUT, provider.current_position())
        .await
        .unwrap_or(Err(LocationError::Timeout))
}

/// Resolves once `signal` fires. If the signal can't be listened for the
/// session runs until its tick budget is spent.
async fn shutdown_on(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = signal.await {
        warn!(error = %err, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    if args.tick_seconds == 0 {
        bail!("--tick-seconds must be at least 1");
    }

    let mut prefs = Preferences::new(open_store(args.db.as_ref())?);

    let mut settings = prefs.notification_settings()?;
    if let Some(stops_away) = args.stops_away {
        settings.stops_away = stops_away;
    }
    if args.auto_notifications {
        settings.auto_notifications = true;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }

    let topology = load_topology(args.topology.as_ref())?;
    let mut session = Session::with_seed_buses(Arc::new(topology), TracingSink)
        .with_settings(settings);

    if !prefs.has_seen_welcome()? {
        info!("Welcome, {}! Notifications are on.", prefs.user_name()?);
        session.enable_notifications();
        prefs.mark_welcome_seen()?;
    }

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        let provider = FixedPosition::at(lat, lon);
        if let Some(message) = session.apply_location_result(locate(&provider).await) {
            warn!("{message}");
        }
    } else if let Some(name) = &args.at_stop {
        let Some(stop) = session
            .topology()
            .lines()
            .iter()
            .flat_map(|line| &line.stops)
            .find(|stop| stop.name.eq_ignore_ascii_case(name))
            .cloned()
        else {
            bail!("no stop named {name:?}");
        };
        session.location_from_stop(&stop);
    } else {
        session.set_user_location(prefs.user_location()?);
    }
    prefs.set_user_location(session.user_location())?;

    for entry in session.stop_directory().entries().iter().take(5) {
        let lines = entry
            .lines
            .iter()
            .map(|line| line.line_name.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        match entry.formatted_distance() {
            Some(distance) => info!("{} ({distance}): {lines}", entry.stop.name),
            None => info!("{}: {lines}", entry.stop.name),
        }
    }

    if let Some(line) = &args.line {
        session
            .select_line(Some(LineIdentifier::new(line)))
            .wrap_err("selecting tracked line")?;
        if let Some(bus) = session.selected_bus() {
            info!(
                bus = %bus.bus_id,
                stop = bus.current_stop_index,
                eta = bus.next_stop_eta,
                crowd = %bus.crowd_level(),
                "tracking"
            );
        }
    }

    let mut random = RngMotion(match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    });

    let ticks = run_session(
        &mut session,
        &mut random,
        Duration::from_secs(args.tick_seconds),
        args.ticks,
        shutdown_on(tokio::signal::ctrl_c()),
    )
    .await;

    prefs.set_notification_settings(session.settings())?;

    let now = SystemClock.now();
    info!(ticks, alerts = session.alerts().len(), "session finished");
    for alert in session.feed().newest_first() {
        println!("[{}] {} ({})", alert.kind, alert.message, alert.age(now));
    }

    Ok(())
}
