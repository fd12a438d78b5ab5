use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ValidationError;

pub const RETRO_COLORS: [&str; 15] = [
    "#FF6B6B", // coral red
    "#4ECDC4", // teal
    "#FFE66D", // yellow
    "#95E1D3", // mint
    "#F38181", // salmon
    "#AA96DA", // lavender
    "#FCBAD3", // pink
    "#A8D8EA", // sky blue
    "#C9E4DE", // pale green
    "#FAAB78", // peach
    "#DDA0DD", // plum
    "#98D8C8", // seafoam
    "#F7DC6F", // gold
    "#BB8FCE", // purple
    "#85C1E9", // light blue
];

pub fn retro_palette() -> Vec<String> {
    RETRO_COLORS.iter().map(|color| color.to_string()).collect()
}

/// Colors for `count` wheel segments, never repeating a palette slot back to back.
pub fn wheel_colors<S: AsRef<str>>(count: usize, palette: &[S]) -> Vec<String> {
    if palette.is_empty() {
        return Vec::new();
    }
    let len = palette.len();
    let mut colors = Vec::with_capacity(count);
    let mut last: Option<usize> = None;
    for i in 0..count {
        let mut idx = i % len;
        if len > 1 && Some(idx) == last {
            idx = (idx + 1) % len;
        }
        colors.push(palette[idx].as_ref().to_string());
        last = Some(idx);
    }
    colors
}

pub fn shuffle_palette<R: Rng + ?Sized, T: Clone>(rng: &mut R, palette: &[T]) -> Vec<T> {
    let mut shuffled = palette.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

pub fn group_color(index: usize) -> &'static str {
    RETRO_COLORS[index % RETRO_COLORS.len()]
}

/// Accepts `#RGB` or `#RRGGBB` and returns it upper-cased.
pub fn parse_hex_color(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let invalid = || ValidationError::InvalidColor {
        value: value.to_string(),
    };
    let digits = trimmed.strip_prefix('#').ok_or_else(invalid)?;
    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Ok(format!("#{}", digits.to_ascii_uppercase()))
}

pub fn parse_palette<S: AsRef<str>>(values: &[S]) -> Result<Vec<String>, ValidationError> {
    values.iter().map(|value| parse_hex_color(value.as_ref())).collect()
}
