use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Winners leave the wheel.
    #[default]
    Class,
    /// Winners stay eligible.
    Game,
}

impl DrawMode {
    pub const ALL: [DrawMode; 2] = [DrawMode::Class, DrawMode::Game];

    pub fn as_str(self) -> &'static str {
        match self {
            DrawMode::Class => "class",
            DrawMode::Game => "game",
        }
    }

    pub fn removes_winner(self) -> bool {
        matches!(self, DrawMode::Class)
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Gameboy,
    Neon,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Default, Theme::Gameboy, Theme::Neon];

    pub fn id(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Gameboy => "gameboy",
            Theme::Neon => "neon",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Default => "Retro Purple",
            Theme::Gameboy => "GameBoy",
            Theme::Neon => "Arcade Neon",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.id().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
