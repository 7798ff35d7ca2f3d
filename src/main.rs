//! Host-side helper.
//!
//! `cargo run -- preview [--filter TEXT] [--layers pm25,o3] [--ticks N] [--seed N]`
//! runs the pipeline headlessly against in-memory surfaces and logs what it
//! would draw. `cargo run -- serve` builds the WASM bundle into `static/pkg`
//! and serves `static/` on port 8000.

use std::env;
use std::process::{Command, ExitCode};

use airviz::animation::AnimationDriver;
use airviz::config::ViewConfig;
use airviz::layers::LayerRenderer;
use airviz::legend::legend_entries;
use airviz::logging;
use airviz::pollutant::Pollutant;
use airviz::store::DashboardState;
use airviz::surface::{ManualScheduler, RecordingCanvas, RecordingMap};
use airviz::synthetic::{synthetic_readings, synthetic_wind};
use airviz::time::now_ms;
use log::{error, info, warn, LevelFilter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct PreviewArgs {
    filter: String,
    layers: Vec<Pollutant>,
    ticks: u32,
    seed: u64,
}

fn parse_preview(args: &[String]) -> Result<PreviewArgs, String> {
    let mut parsed = PreviewArgs { filter: String::new(), layers: vec![Pollutant::Pm25], ticks: 120, seed: 42 };
    let mut it = args.iter();
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--filter" => parsed.filter = value()?.clone(),
            "--layers" => {
                parsed.layers = value()?
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<Pollutant>().map_err(|e| e.to_string()))
                    .collect::<Result<_, _>>()?;
            }
            "--ticks" => parsed.ticks = value()?.parse().map_err(|e| format!("--ticks: {e}"))?,
            "--seed" => parsed.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
            other => return Err(format!("unknown flag {other}")),
        }
    }
    Ok(parsed)
}

fn preview(args: PreviewArgs) {
    let config = ViewConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let now = now_ms();

    let mut state = DashboardState::new(now);
    state.replace_readings(synthetic_readings(&mut rng, now));
    state.set_wind(Some(synthetic_wind(&mut rng, now)));
    state.set_location_filter(args.filter);
    for p in Pollutant::ALL {
        if state.is_active(p) != args.layers.contains(&p) {
            state.toggle_layer(p);
        }
    }

    let filtered = state.filtered_readings();
    let mut layers = LayerRenderer::new(RecordingMap::new(), config.markers);
    let placed = layers.render(state.active_layers(), &filtered);
    info!(
        "{} of {} readings match '{}', {} markers in {} layers",
        filtered.len(),
        state.readings().len(),
        state.location_filter(),
        placed,
        layers.map().group_count()
    );
    for entry in legend_entries(state.active_layers(), &filtered) {
        info!("{}: {} readings, avg {:.1} {} ({})", entry.name, entry.count, entry.average, entry.unit, entry.label);
    }

    let mut driver = AnimationDriver::new(ManualScheduler::new(), RecordingCanvas::new(1280.0, 720.0), config.particles, args.seed);
    if !driver.enable(state.wind()) {
        warn!("no wind, skipping particle preview");
        return;
    }
    for _ in 0..args.ticks {
        if driver.scheduler_mut().fire().is_none() {
            break;
        }
        driver.on_frame(state.wind());
    }
    let mean_alpha = {
        let circles = &driver.surface().circles;
        circles.iter().map(|c| c.alpha).sum::<f64>() / circles.len().max(1) as f64
    };
    info!("{} frames drawn, mean particle alpha {:.3}", driver.frames(), mean_alpha);
    driver.disable();
}

fn serve() -> ExitCode {
    info!("building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            error!("wasm-pack finished with errors");
            return ExitCode::FAILURE;
        }
        Err(_) => warn!("wasm-pack not found in PATH, serving possibly stale artifacts"),
    }

    info!("serving static/ at http://127.0.0.1:8000");
    match Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .status()
    {
        Ok(st) if st.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("failed to start http server: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    logging::init(LevelFilter::Info);
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("serve") => serve(),
        Some("preview") | None => match parse_preview(args.get(1..).unwrap_or(&[])) {
            Ok(parsed) => {
                preview(parsed);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        },
        Some(other) => {
            error!("unknown command {other}; expected `preview` or `serve`");
            ExitCode::FAILURE
        }
    }
}
