use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod fetch;
mod output;

use fetch::FileFetcher;
use output::write_traffic_geojson;
use station_traffic::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "traffic-report",
    author,
    version,
    about = "Aggregate bikeshare station traffic for a time-of-day window",
    long_about = "Loads a station list and a month of trips, counts departures and \
                  arrivals per station within a window around the selected minute \
                  of the day, and writes the result as GeoJSON points.\n\n\
                  The window wraps past midnight, so a 00:30 filter also counts \
                  trips from 23:30 onwards."
)]
struct Args {
    /// Station list JSON (GBFS station_information or a bare array)
    #[arg(short, long)]
    stations: PathBuf,

    /// Trip CSV with started_at, ended_at, start_station_id, end_station_id
    #[arg(short, long)]
    trips: PathBuf,

    /// Slider value: minute of day 0-1439, or -1 for any time
    #[arg(long, default_value_t = -1, allow_negative_numbers = true, conflicts_with = "at")]
    time: i32,

    /// Center of the window as HH:MM (alternative to --time)
    #[arg(long)]
    at: Option<String>,

    /// Minutes on each side of the center
    #[arg(short, long, default_value_t = WindowConfig::DEFAULT_HALF_WIDTH)]
    window: u16,

    /// Output GeoJSON file for station traffic
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Drop trip rows with unparseable timestamps instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// Number of busiest stations to list
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Also scrub through the day in steps of this many minutes
    #[arg(long)]
    sweep: Option<u16>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

/// Parse "HH:MM" into a slider value
fn parse_clock(value: &str) -> Result<i32> {
    let (hour, minute) = value
        .split_once(':')
        .with_context(|| format!("Expected HH:MM, got {:?}", value))?;
    let hour: u32 = hour.trim().parse().context("Invalid hour")?;
    let minute: u32 = minute.trim().parse().context("Invalid minute")?;

    match MinuteOfDay::from_hm(hour, minute) {
        Some(m) => Ok(m.get() as i32),
        None => bail!("{} is not a time of day", value),
    }
}

fn log_top_stations(view: &[StationTraffic], scales: &ScaleModel, top: usize) {
    let mut ranked: Vec<&StationTraffic> = view.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_traffic()
            .cmp(&a.total_traffic())
            .then_with(|| a.id().cmp(b.id()))
    });

    for traffic in ranked.iter().take(top).filter(|s| s.total_traffic() > 0) {
        let flow = match scales.flow_of(traffic) {
            Some(FlowLevel::DepartureHeavy) => "more departures",
            Some(FlowLevel::ArrivalHeavy) => "more arrivals",
            Some(FlowLevel::Balanced) => "balanced",
            None => "-",
        };
        log::info!(
            "  {:<10} {:>6} trips ({:>5} dep / {:>5} arr), r={:.1}px, {}",
            traffic.id().as_str(),
            traffic.total_traffic(),
            traffic.departures(),
            traffic.arrivals(),
            scales.radius_of(traffic),
            flow
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Station Traffic Report ===");
    log::info!("Stations: {}", args.stations.display());
    log::info!("Trips: {}", args.trips.display());

    // Validate input files exist
    for path in [&args.stations, &args.trips] {
        if !path.exists() {
            bail!("Input file does not exist: {}", path.display());
        }
    }

    let slider = match &args.at {
        Some(clock) => parse_clock(clock)?,
        None => args.time,
    };
    let filter = TimeFilter::from_slider(slider).context("Invalid --time")?;

    let mut config = EngineConfig::default();
    config.window.half_width_minutes = args.window;

    let policy = if args.skip_invalid {
        RowPolicy::Skip
    } else {
        RowPolicy::Strict
    };

    // Phase 1: Load and index
    log::info!("");
    log::info!("Phase 1: Loading stations and trips...");
    let fetcher = FileFetcher::new(".");
    let source = DataSource::new(
        args.stations.to_string_lossy(),
        args.trips.to_string_lossy(),
    );
    let mut engine = pollster::block_on(TrafficEngine::load(&fetcher, &source, config, policy))
        .context("Failed to load bikeshare data")?;
    log::info!(
        "  {} stations, {} trips indexed",
        engine.all_stations().len(),
        engine.trip_count()
    );

    // Phase 2: Apply the filter
    log::info!("");
    log::info!("Phase 2: Aggregating traffic for {}...", filter);
    if let Some(center) = filter.center() {
        let window = MinuteWindow::new(center, args.window)?;
        log::info!(
            "  Window {} - {}{}",
            window.lo(),
            window.hi(),
            if window.wraps() { " (crosses midnight)" } else { "" }
        );
    }
    engine.set_filter(filter)?;

    let total: u64 = engine.view().iter().map(|s| s.total_traffic() as u64).sum();
    let idle = engine.view().iter().filter(|s| s.total_traffic() == 0).count();
    log::info!("  {} station events, {} stations idle", total, idle);
    log_top_stations(engine.view(), engine.scales(), args.top);

    // Phase 3: Optional sweep through the day
    if let Some(step) = args.sweep {
        if step == 0 {
            bail!("--sweep step must be at least one minute");
        }
        log::info!("");
        log::info!("Phase 3: Sweeping the day every {} minutes...", step);
        let mut sweep = engine.clone();
        for minute in (0..MINUTES_PER_DAY).step_by(step as usize) {
            let view = sweep.set_slider(minute as i32)?;
            let busiest = view.iter().max_by_key(|s| s.total_traffic());
            let events: u64 = view.iter().map(|s| s.total_traffic() as u64).sum();
            match busiest {
                Some(station) if station.total_traffic() > 0 => log::info!(
                    "  {:>8}: {:>7} events, busiest {} ({})",
                    MinuteOfDay::new(minute).map(|m| m.clock_label()).unwrap_or_default(),
                    events,
                    station.id(),
                    station.total_traffic()
                ),
                _ => log::info!(
                    "  {:>8}: no traffic",
                    MinuteOfDay::new(minute).map(|m| m.clock_label()).unwrap_or_default()
                ),
            }
        }
    }

    // Phase 4: Write output
    if let Some(output_path) = &args.output {
        log::info!("");
        log::info!("Phase 4: Writing output...");
        write_traffic_geojson(engine.view(), engine.scales(), engine.filter(), output_path)
            .context("Failed to write traffic GeoJSON")?;
        log::info!("Output written to: {}", output_path.display());
    }

    log::info!("Done!");

    Ok(())
}
