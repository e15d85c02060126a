use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use treemorph::error::{SceneError, ViewerError};
use treemorph::viewer::{self, ViewerOptions};
use treemorph::{Scene, SceneConfig, TreeState};

#[derive(Parser)]
#[command(name = "treemorph")]
#[command(about = "Particles that gather from a scattered cloud into a spiral tree", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene config (JSON). Built-in scene when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for batches without their own
    #[arg(long)]
    seed: Option<u64>,

    /// State to start moving toward
    #[arg(long, value_enum)]
    state: Option<StateArg>,

    /// Write the effective config to this path and exit
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,

    /// Advance batches in parallel
    #[arg(long)]
    parallel: bool,

    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum StateArg {
    Scattered,
    Tree,
}

impl From<StateArg> for TreeState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Scattered => TreeState::Scattered,
            StateArg::Tree => TreeState::Tree,
        }
    }
}

fn main() -> Result<(), ViewerError> {
    let cli = Cli::parse();

    // RUST_LOG still wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(state) = cli.state {
        config.initial_state = state.into();
    }

    if let Some(path) = &cli.dump_config {
        config.save(path)?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    let scene = Scene::from_config(&config).map_err(SceneError::from)?;
    viewer::run(
        scene,
        ViewerOptions {
            parallel: cli.parallel,
            ..ViewerOptions::default()
        },
    )
}
