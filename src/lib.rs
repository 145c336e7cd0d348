pub mod ai;
pub mod board;
pub mod cli;
pub mod forbidden;
pub mod game;
pub mod game_logger;
pub mod player;
pub mod scanner;
pub mod scores;
pub mod session;
pub mod terminal_ui;
pub mod threat;
pub mod win;
