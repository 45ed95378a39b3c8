//! Road Rush headless demo
//!
//! Runs a seeded autopilot session through the simulation core and reports
//! the result. Rendering and device input live in the host shell.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use clap::Parser;

    use road_rush::audio::{AudioMixer, NullSink};
    use road_rush::highscores::{FileStore, HighScoreStore, MemoryStore, load_or_zero};
    use road_rush::sim::{GameEvent, GameState, TickInput, tick};
    use road_rush::{GameConfig, format_time};

    /// Fixed step the demo drives the simulation at
    const STEP: f32 = 1.0 / 60.0;
    /// Progress log interval (ticks)
    const REPORT_EVERY: u64 = 600;

    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Run seed
        #[arg(short, long, default_value_t = 1)]
        seed: u64,
        /// Simulated seconds before the run is ended
        #[arg(short = 't', long, default_value_t = 60.0)]
        seconds: f32,
        /// JSON balance config (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON file holding the best score (in-memory when omitted)
        #[arg(long)]
        high_score_file: Option<PathBuf>,
        /// Print the final frame snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let mixer = AudioMixer::new(&config.audio);

        let mut store: Box<dyn HighScoreStore> = match &args.high_score_file {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        let best = load_or_zero(store.as_ref());

        let mut state = GameState::new(config, args.seed)?.with_high_score(best);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let total_ticks = (args.seconds.max(0.0) / STEP).round() as u64;
        let mut cues = 0usize;
        let mut sink = NullSink;

        for _ in 0..total_ticks {
            tick(&mut state, &input, STEP);
            let events = state.drain_events();
            cues += mixer.dispatch(&events, &mut sink);
            for event in &events {
                if let GameEvent::TierChanged { tier } = event {
                    log::info!("Difficulty tier {} reached at {}", tier, format_time(state.survival_ms));
                }
            }

            if state.time_ticks % REPORT_EVERY == 0 {
                let hud = state.hud();
                log::info!(
                    "{} score {} kills {} combo {} pursuers {}",
                    hud.time_text,
                    hud.score,
                    hud.kills,
                    hud.combo,
                    state.active_pursuers()
                );
            }
        }

        let new_best = state.end_run(store.as_mut());
        let hud = state.hud();
        log::info!(
            "Run over after {}: score {} (best {}), {} kills, {} near misses, {} sound cues{}",
            hud.time_text,
            hud.score,
            hud.high_score,
            hud.kills,
            hud.near_misses,
            cues,
            if new_best { ", new high score!" } else { "" }
        );

        if args.snapshot {
            println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Road Rush (headless) starting...");

    if let Err(e) = demo::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `road_rush::sim` directly
}
