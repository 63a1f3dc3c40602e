use std::fmt;

pub const BRIGHTNESS_PREFIX: &str = "lum_";
pub const NAVIGATE_PREFIX: &str = "dir_";
pub const RESET: &str = "reset";
pub const TOGGLE_PLAY: &str = "toggle_play";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action requested from the panel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, clap::Subcommand)]
pub enum Command {
    /// Step the display brightness.
    Brightness {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Move through the displayed content.
    Navigate {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Reset the displayed content.
    Reset,
    /// Toggle between playing and paused.
    TogglePlay,
}

impl Command {
    /// Wire form sent as the `name` query value.
    pub fn encode(&self) -> String {
        match self {
            Command::Brightness { direction } => format!("{}{}", BRIGHTNESS_PREFIX, direction),
            Command::Navigate { direction } => format!("{}{}", NAVIGATE_PREFIX, direction),
            Command::Reset => RESET.to_owned(),
            Command::TogglePlay => TOGGLE_PLAY.to_owned(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
