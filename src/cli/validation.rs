use crate::chess::{parse_promotion, parse_square, Color, Move, Square};
use regex::Regex;
use std::sync::OnceLock;

/// Why a line typed during a game could not be understood
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid chess move: {0}")]
    InvalidMove(String),

    #[error("Invalid color specification: {0}")]
    InvalidColor(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unknown command '{0}'. Type 'help' for the list of commands")]
    UnknownCommand(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// One line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Move(Move),
    Select(Square),
    Resign,
    Draw,
    Flip,
    NewGame,
    Reset,
    Retry,
    /// Step one move back in history
    Back,
    Forward,
    Start,
    End,
    /// Show the position after this many plies
    GoTo(isize),
    Moves,
    Pgn,
    Fen,
    Board,
    Sound(bool),
    Volume(f32),
    Coordinates(bool),
    Help,
    Quit,
}

// e2e4, e2-e4, e2 e4, e7e8q, e7e8=Q
const MOVE_PATTERN: &str = r"^([a-h][1-8])[\s-]?([a-h][1-8])(?:=?([qrbnQRBN]))?$";
const SQUARE_PATTERN: &str = r"^[a-h][1-8]$";

type CachedRegex = OnceLock<Result<Regex, regex::Error>>;

static MOVE_REGEX: CachedRegex = OnceLock::new();
static SQUARE_REGEX: CachedRegex = OnceLock::new();

/// Compiled once per process, then shared by every parse
fn compiled(cell: &'static CachedRegex, pattern: &str) -> ValidationResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ValidationError::InvalidMove(e.to_string()))
}

fn move_regex() -> ValidationResult<&'static Regex> {
    compiled(&MOVE_REGEX, MOVE_PATTERN)
}

fn square_regex() -> ValidationResult<&'static Regex> {
    compiled(&SQUARE_REGEX, SQUARE_PATTERN)
}

/// Parse a coordinate move such as `e2e4` or `e7e8=q`
pub fn parse_move(input: &str) -> ValidationResult<Move> {
    let trimmed = input.trim().to_ascii_lowercase();
    let captures = move_regex()?.captures(&trimmed).ok_or_else(|| {
        ValidationError::InvalidMove(format!(
            "'{}' is not a move. Use coordinates like 'e2e4', or 'e7e8q' to promote",
            input.trim()
        ))
    })?;

    let square = |index: usize| -> ValidationResult<Square> {
        let text = captures.get(index).map_or("", |m| m.as_str());
        parse_square(text).map_err(|e| ValidationError::InvalidMove(e.to_string()))
    };
    let origin = square(1)?;
    let destination = square(2)?;
    let promotion = match captures.get(3).and_then(|m| m.as_str().chars().next()) {
        Some(c) => Some(
            parse_promotion(c).map_err(|e| ValidationError::InvalidMove(e.to_string()))?,
        ),
        None => None,
    };

    Move::new(origin, destination, promotion)
        .map_err(|e| ValidationError::InvalidMove(e.to_string()))
}

/// Accepts: white, black, w, b, random, rand (case insensitive).
/// `None` means pick at random.
pub fn parse_color(color_str: &str) -> ValidationResult<Option<Color>> {
    let normalized = color_str.trim().to_lowercase();

    match normalized.as_str() {
        "white" | "w" => Ok(Some(Color::White)),
        "black" | "b" => Ok(Some(Color::Black)),
        "random" | "rand" | "r" | "" => Ok(None),
        _ => Err(ValidationError::InvalidColor(format!(
            "'{}' is not a valid color. Use 'white', 'black', or 'random'",
            color_str
        ))),
    }
}

fn parse_toggle(value: Option<&str>) -> ValidationResult<bool> {
    match value.map(|v| v.to_lowercase()).as_deref() {
        Some("on") | Some("yes") | Some("true") => Ok(true),
        Some("off") | Some("no") | Some("false") => Ok(false),
        other => Err(ValidationError::InvalidNumber(format!(
            "expected 'on' or 'off', got '{}'",
            other.unwrap_or("")
        ))),
    }
}

/// Interpret one line typed during a game
pub fn parse_input(line: &str) -> ValidationResult<InputCommand> {
    let trimmed = line.trim();
    let mut words = trimmed.split_whitespace();
    let head = words.next().unwrap_or("").to_lowercase();
    let arg = words.next();

    let command = match head.as_str() {
        "" | "board" | "show" => InputCommand::Board,
        "resign" => InputCommand::Resign,
        "draw" => InputCommand::Draw,
        "flip" => InputCommand::Flip,
        "new" => InputCommand::NewGame,
        "reset" => InputCommand::Reset,
        "retry" => InputCommand::Retry,
        "back" | "prev" => InputCommand::Back,
        "forward" | "next" => InputCommand::Forward,
        "start" => InputCommand::Start,
        "end" | "live" => InputCommand::End,
        "goto" => {
            let plies = arg
                .ok_or_else(|| ValidationError::InvalidNumber("goto needs a ply count".to_string()))?
                .parse::<isize>()
                .map_err(|e| ValidationError::InvalidNumber(e.to_string()))?;
            InputCommand::GoTo(plies)
        }
        "moves" | "history" => InputCommand::Moves,
        "pgn" => InputCommand::Pgn,
        "fen" => InputCommand::Fen,
        "sound" => InputCommand::Sound(parse_toggle(arg)?),
        "coords" | "coordinates" => InputCommand::Coordinates(parse_toggle(arg)?),
        "volume" => {
            let volume = arg
                .ok_or_else(|| ValidationError::InvalidNumber("volume needs a value".to_string()))?
                .parse::<f32>()
                .map_err(|e| ValidationError::InvalidNumber(e.to_string()))?;
            InputCommand::Volume(volume)
        }
        "help" | "?" => InputCommand::Help,
        "quit" | "exit" | "q" => InputCommand::Quit,
        _ => {
            if move_regex()?.is_match(&trimmed.to_ascii_lowercase()) {
                InputCommand::Move(parse_move(trimmed)?)
            } else if arg.is_none() && square_regex()?.is_match(&head) {
                let square =
                    parse_square(&head).map_err(|e| ValidationError::InvalidMove(e.to_string()))?;
                InputCommand::Select(square)
            } else {
                return Err(ValidationError::UnknownCommand(trimmed.to_string()));
            }
        }
    };

    Ok(command)
}
