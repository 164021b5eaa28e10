/*
 * Koi Aquarium
 *
 * Schooling koi and a single predator swimming in a glass tank. Fish follow
 * separation, alignment and cohesion within their own school, keep away from
 * the walls and jitter slightly; the predator picks a fish every few seconds
 * and chases it.
 *
 * Run with `--headless <TICKS>` to simulate without a window.
 */

use clap::Parser;
use tracing_subscriber::EnvFilter;

use koi_aquarium::cli::Args;
use koi_aquarium::headless;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let params = match args.load_params() {
        Ok(params) => params,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        seed = params.seed,
        fish = params.num_fish,
        groups = params.group_count,
        mode = ?params.update_mode,
        "Koi aquarium starting"
    );

    if let Some(ticks) = args.headless {
        match headless::run(params, ticks) {
            Ok(summary) => {
                tracing::info!(%summary, "headless run finished");
                println!("{summary}");
            }
            Err(err) => {
                tracing::error!(%err, "headless run failed");
                std::process::exit(1);
            }
        }
        return;
    }

    run_viewer();
}

#[cfg(feature = "viewer")]
fn run_viewer() {
    nannou::app(koi_aquarium::app::model)
        .update(koi_aquarium::app::update)
        .run();
}

#[cfg(not(feature = "viewer"))]
fn run_viewer() {
    tracing::error!("built without the `viewer` feature; use --headless <TICKS>");
    std::process::exit(2);
}
