use crate::cli::display::{display_session, render_move_list, supports_unicode};
use crate::cli::error_handler::{display_error, is_recoverable_error, CliError};
use crate::cli::validation::{parse_input, InputCommand};
use crate::game::{DrawPolicy, GameConfig, GameController, SettingsPatch};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

pub const HELP: &str = "\
Moves:      e2e4, e2-e4, e7e8q (promotion), or a square to select then its target
Game:       resign, draw, flip, new, reset, retry (ask the engine again)
History:    back, forward, start, end, goto <plies>, moves
Export:     pgn, fen
Settings:   sound on|off, volume <0..1>, coords on|off
Other:      board, help, quit";

/// Whether the interactive loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub flow: Flow,
    pub message: Option<String>,
}

impl CommandOutput {
    fn done() -> Self {
        Self {
            flow: Flow::Continue,
            message: None,
        }
    }

    fn say(message: impl Into<String>) -> Self {
        Self {
            flow: Flow::Continue,
            message: Some(message.into()),
        }
    }
}

/// Run one parsed command against the controller
pub async fn execute_command(
    controller: &mut GameController,
    command: InputCommand,
) -> Result<CommandOutput, CliError> {
    let index = controller.session().current_move_index();

    match command {
        InputCommand::Move(mv) => controller.apply_move(mv).await?,
        InputCommand::Select(square) => {
            controller.select_square(square).await?;
            let selection = controller.session().selection();
            if selection.selected() == Some(square) {
                let targets: Vec<String> = selection
                    .legal_destinations()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                return Ok(CommandOutput::say(if targets.is_empty() {
                    format!("{} has no legal moves", square)
                } else {
                    format!("{} can move to: {}", square, targets.join(" "))
                }));
            }
        }
        InputCommand::Resign => controller.resign().await?,
        InputCommand::Draw => {
            controller.offer_draw().await?;
            let session = controller.session();
            if !session.game_over() && session.draw_policy() == DrawPolicy::Decline {
                return Ok(CommandOutput::say("The engine declines the draw offer."));
            }
        }
        InputCommand::Flip => controller.flip_board().await?,
        InputCommand::NewGame => {
            let session = controller.session();
            let config = GameConfig {
                player_color: session.player_color(),
                start_fen: None,
                time_control: session.time_control(),
                target_elo: Some(session.target_elo()),
            };
            controller.new_game(config).await?;
        }
        InputCommand::Reset => controller.reset_game().await?,
        InputCommand::Retry => controller.retry_engine().await?,
        InputCommand::Back => controller.go_to_move(index - 1).await?,
        InputCommand::Forward => controller.go_to_move(index + 1).await?,
        InputCommand::Start => controller.go_to_move(-1).await?,
        InputCommand::End => {
            let last = controller.session().history().len() as isize - 1;
            controller.go_to_move(last).await?
        }
        InputCommand::GoTo(plies) => controller.go_to_move(plies.saturating_sub(1)).await?,
        InputCommand::Moves => {
            return Ok(CommandOutput::say(render_move_list(controller.session())))
        }
        InputCommand::Pgn => return Ok(CommandOutput::say(controller.session().pgn())),
        InputCommand::Fen => return Ok(CommandOutput::say(controller.session().fen())),
        InputCommand::Board => {}
        InputCommand::Sound(enabled) => {
            controller
                .update_settings(SettingsPatch {
                    sound_enabled: Some(enabled),
                    ..SettingsPatch::default()
                })
                .await?
        }
        InputCommand::Volume(volume) => {
            controller
                .update_settings(SettingsPatch {
                    sound_volume: Some(volume),
                    ..SettingsPatch::default()
                })
                .await?
        }
        InputCommand::Coordinates(show) => {
            controller
                .update_settings(SettingsPatch {
                    show_coordinates: Some(show),
                    ..SettingsPatch::default()
                })
                .await?
        }
        InputCommand::Help => return Ok(CommandOutput::say(HELP)),
        InputCommand::Quit => {
            return Ok(CommandOutput {
                flow: Flow::Quit,
                message: None,
            })
        }
    }

    Ok(CommandOutput::done())
}

/// Read commands from stdin until the player quits or input ends
pub async fn run_interactive(controller: &mut GameController) -> Result<()> {
    let unicode = supports_unicode();
    display_session(controller.session(), unicode);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        controller.tick_now().await?;

        let result = match parse_input(&line) {
            Ok(command) => {
                debug!("Executing {:?}", command);
                execute_command(controller, command).await
            }
            Err(e) => Err(CliError::from(e)),
        };

        match result {
            Ok(output) => {
                if let Some(message) = output.message {
                    println!("{}", message);
                }
                if output.flow == Flow::Quit {
                    break;
                }
            }
            Err(e) => {
                display_error(&e);
                if !is_recoverable_error(&e) {
                    return Err(anyhow::anyhow!(e.to_string()));
                }
            }
        }

        display_session(controller.session(), unicode);
    }

    Ok(())
}
