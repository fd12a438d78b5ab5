use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::layout::{normalize_angle, segment_angle, FULL_TURN_DEG};

pub const SPIN_DURATION_MS: i64 = 5000;
pub const MIN_SPIN_PARTICIPANTS: usize = 2;
pub const MIN_FULL_ROTATIONS: f64 = 5.0;
pub const EXTRA_FULL_ROTATIONS: f64 = 5.0;
/// The pointer sits at the top of the wheel; segment 0 starts there (-90 ≡ 270).
pub const POINTER_ANGLE_DEG: f64 = 270.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinOutcome {
    pub new_rotation: f64,
    pub winner_index: usize,
}

pub fn spin_delta<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let full_rotations =
        FULL_TURN_DEG * (MIN_FULL_ROTATIONS + rng.random::<f64>() * EXTRA_FULL_ROTATIONS);
    let random_offset = rng.random::<f64>() * FULL_TURN_DEG;
    full_rotations + random_offset
}

/// Index of the segment under the pointer once the wheel rests at `rotation`.
pub fn winner_index(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let normalized = normalize_angle(rotation);
    let pointer = (FULL_TURN_DEG - normalized + POINTER_ANGLE_DEG) % FULL_TURN_DEG;
    let index = (pointer / segment_angle(count)).floor() as usize;
    Some(index % count)
}

pub fn spin<R: Rng + ?Sized>(rng: &mut R, current_rotation: f64, count: usize) -> Option<SpinOutcome> {
    if count < MIN_SPIN_PARTICIPANTS {
        return None;
    }
    let new_rotation = current_rotation + spin_delta(rng);
    let winner_index = winner_index(new_rotation, count)?;
    Some(SpinOutcome {
        new_rotation,
        winner_index,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    pub cumulative_rotation: f64,
    pub is_spinning: bool,
}

impl SpinState {
    pub fn can_spin(&self, count: usize) -> bool {
        !self.is_spinning && count >= MIN_SPIN_PARTICIPANTS
    }

    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Option<SpinOutcome> {
        if !self.can_spin(count) {
            return None;
        }
        let outcome = spin(rng, self.cumulative_rotation, count)?;
        self.cumulative_rotation = outcome.new_rotation;
        self.is_spinning = true;
        Some(outcome)
    }

    pub fn finish(&mut self) {
        self.is_spinning = false;
    }
}
