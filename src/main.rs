use clap::Parser;
use env_logger::Env;
use log::{info, LevelFilter};
use omok::cli::{CliArgs, GameModeArg};
use omok::game::{Game, GameConfig, GameMode};
use omok::player::Role;
use simplelog::{Config, WriteLogger};
use std::fs::File;

fn main() -> anyhow::Result<()> {
  // 1) Parse command line arguments
  let args = CliArgs::parse();

  // 2) Convert args.mode to our enum GameMode
  let mode = match args.mode {
    GameModeArg::HumanAi => GameMode::AIvHuman,
    GameModeArg::AiAi => GameMode::AIvAI,
    GameModeArg::HumanHuman => GameMode::HumanvHuman,
  };

  // 3) Logging: the terminal modes own the screen, so their log goes to a file
  match mode {
    GameMode::AIvAI => env_logger::Builder::from_env(Env::default().default_filter_or("info")).init(),
    GameMode::AIvHuman | GameMode::HumanvHuman => {
      WriteLogger::init(LevelFilter::Info, Config::default(), File::create(&args.log_file)?)?;
    }
  }

  let config = GameConfig {
    mode,
    human_role: Role::from(args.color),
    seed: args.seed,
    think: !args.no_delay,
    log_file: args.log_file,
    max_moves: args.max_moves,
  };
  info!("starting {:?}, human plays {}, seed {:?}", config.mode, config.human_role, config.seed);

  // 4) Create and run the game
  let mut game = Game::new(config);
  game.run()
}
