use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use engine::{Config, Runtime};

mod run;

pub const GAME_NAME: &str = "robotrl";

#[derive(Parser, Debug)]
#[command(name = GAME_NAME, about = "Turn-based robot combat roguelike")]
struct Args {
    #[arg(long, help = "Game seed, overrides the config file")]
    seed: Option<String>,

    #[arg(long, help = "IDM config file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        help = "Whitespace separated key presses to play, eg. \"k k l S-q\""
    )]
    keys: Option<String>,

    #[arg(
        long,
        default_value_t = 0,
        help = "Turns to wait after the key script runs out"
    )]
    turns: usize,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("{}: {e}", path.display()))?;
            parse_config(&text)
                .map_err(|e| anyhow!("{}: {e}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(seed) = &args.seed {
        config.seed = seed.clone();
    }
    Ok(config)
}

fn parse_config(text: &str) -> anyhow::Result<Config> {
    idm::from_str(text).map_err(|e| anyhow!("bad config: {e}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    log::info!("seed: {}", config.seed);

    let keys = match &args.keys {
        Some(script) => ui::parse_keys(script).map_err(|e| anyhow!(e))?,
        None => Vec::new(),
    };

    let mut runtime = Runtime::test_level(config)
        .map_err(|e| anyhow!("failed to set up level: {e}"))?;
    let mut controller = ui::Controller::default();

    let status = run::play(&mut runtime, &mut controller, &keys, args.turns);
    log::info!("stopped at {} with {status:?}", runtime.now());

    for line in run::screen(&runtime, &controller) {
        println!("{line}");
    }

    Ok(())
}
