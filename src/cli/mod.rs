pub mod app;
pub mod commands;
pub mod display;
pub mod error_handler;
pub mod game_ops;
pub mod validation;

pub use app::{App, Config, PlayOptions, DATA_DIR_ENV};
pub use commands::{Cli, Commands, ConfigCommand};
pub use display::{
    display_games_list, display_session, render_board, render_move_list, render_status,
    supports_unicode,
};
pub use error_handler::CliError;
pub use game_ops::{execute_command, run_interactive, CommandOutput, Flow};
pub use validation::{parse_color, parse_input, parse_move, InputCommand, ValidationError};
