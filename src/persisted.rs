use serde::{Deserialize, Serialize};

use gacha_wheel_core::colors::retro_palette;
use gacha_wheel_core::{DrawMode, Theme};

pub const MEMBERS_KEY: &str = "gacha-members";
pub const HISTORY_KEY: &str = "gacha-history";
pub const MODE_KEY: &str = "gacha-mode";
pub const THEME_KEY: &str = "gacha-theme";
pub const SOUND_KEY: &str = "gacha-sound";
pub const COLOR_LOCKED_KEY: &str = "gacha-color-locked";
pub const COLORS_KEY: &str = "gacha-colors";
/// Winner taken off the wheel in class mode, kept so a later undo can put it back.
pub const LAST_REMOVED_KEY: &str = "gacha-last-removed";

pub const ALL_KEYS: &[&str] = &[
    MEMBERS_KEY,
    HISTORY_KEY,
    MODE_KEY,
    THEME_KEY,
    SOUND_KEY,
    COLOR_LOCKED_KEY,
    COLORS_KEY,
    LAST_REMOVED_KEY,
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub mode: DrawMode,
    pub theme: Theme,
    pub sound_enabled: bool,
    pub color_locked: bool,
    pub custom_colors: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mode: DrawMode::default(),
            theme: Theme::default(),
            sound_enabled: true,
            color_locked: false,
            custom_colors: retro_palette(),
        }
    }
}
