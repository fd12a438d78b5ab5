pub const SPIN_TICK_HZ: f32 = 800.0;
pub const FANFARE_NOTES_HZ: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];
pub const GROUP_TICK_BASE_HZ: f32 = 600.0;
pub const GROUP_TICK_STEP_HZ: f32 = 100.0;

const TICK_INTERVAL_START_MS: f64 = 50.0;
const TICK_INTERVAL_SPAN_MS: f64 = 200.0;
const TICK_INTERVAL_MAX_MS: f64 = 250.0;

#[derive(Debug, Clone, thiserror::Error)]
#[error("audio unavailable: {0}")]
pub struct SoundError(pub String);

/// Fire-and-forget audio cues. Failures are reported but never block a spin.
pub trait SoundPort {
    fn play_tick(&mut self, frequency_hz: f32) -> Result<(), SoundError>;
    fn play_fanfare(&mut self, notes_hz: &[f32]) -> Result<(), SoundError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundPort for Silent {
    fn play_tick(&mut self, _frequency_hz: f32) -> Result<(), SoundError> {
        Ok(())
    }

    fn play_fanfare(&mut self, _notes_hz: &[f32]) -> Result<(), SoundError> {
        Ok(())
    }
}

pub fn group_tick_hz(group_index: usize) -> f32 {
    GROUP_TICK_BASE_HZ + GROUP_TICK_STEP_HZ * group_index as f32
}

/// Millisecond offsets of the ticks played while the wheel decelerates.
pub fn spin_tick_schedule(duration_ms: i64) -> Vec<i64> {
    let duration = duration_ms as f64;
    let mut offsets = Vec::new();
    let mut elapsed = 0.0;
    let mut interval = TICK_INTERVAL_START_MS;
    let mut at = 0.0;
    while elapsed < duration {
        offsets.push(at as i64);
        elapsed += interval;
        let progress = elapsed / duration;
        interval = (TICK_INTERVAL_START_MS + progress * TICK_INTERVAL_SPAN_MS).min(TICK_INTERVAL_MAX_MS);
        at += interval;
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_slows_down() {
        let offsets = spin_tick_schedule(5000);
        assert_eq!(offsets[0], 0);
        let gaps: Vec<i64> = offsets.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.windows(2).all(|w| w[1] >= w[0]));
        assert!(gaps.iter().all(|gap| *gap <= 250));
        assert!(spin_tick_schedule(0).is_empty());
    }

    #[test]
    fn group_pitch_rises_per_group() {
        assert_eq!(group_tick_hz(0), 600.0);
        assert_eq!(group_tick_hz(3), 900.0);
    }
}
