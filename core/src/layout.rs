use serde::{Deserialize, Serialize};

pub const FULL_TURN_DEG: f64 = 360.0;
/// Angle where segment 0 begins: the top of the circle in screen coordinates.
pub const SEGMENT_ORIGIN_DEG: f64 = -90.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_deg: f64,
    pub end_deg: f64,
    pub color_index: usize,
}

impl Segment {
    pub fn sweep(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    pub fn is_full_circle(&self) -> bool {
        self.sweep() >= FULL_TURN_DEG
    }
}

pub fn segment_angle(count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    FULL_TURN_DEG / count as f64
}

/// Angle through the middle of `segment`, where its label sits.
pub fn segment_mid_angle(segment: &Segment) -> f64 {
    segment.start_deg + segment.sweep() * 0.5
}

pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle % FULL_TURN_DEG;
    if wrapped < 0.0 {
        wrapped + FULL_TURN_DEG
    } else {
        wrapped
    }
}

pub fn compute_layout(count: usize) -> Vec<Segment> {
    match count {
        0 => Vec::new(),
        1 => vec![Segment {
            start_deg: 0.0,
            end_deg: FULL_TURN_DEG,
            color_index: 0,
        }],
        _ => {
            let sweep = segment_angle(count);
            (0..count)
                .map(|i| {
                    let start_deg = i as f64 * sweep + SEGMENT_ORIGIN_DEG;
                    Segment {
                        start_deg,
                        end_deg: start_deg + sweep,
                        color_index: i,
                    }
                })
                .collect()
        }
    }
}
