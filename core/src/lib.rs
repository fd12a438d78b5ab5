pub mod codec;
pub mod colors;
pub mod error;
pub mod export;
pub mod history;
pub mod layout;
pub mod participant;
pub mod partition;
pub mod seed;
pub mod settings;
pub mod wheel;

pub use codec::{decode, encode};
pub use colors::{group_color, parse_hex_color, retro_palette, shuffle_palette, wheel_colors, RETRO_COLORS};
pub use error::ValidationError;
pub use export::{format_utc, groups_text, history_text};
pub use history::{History, HistoryRecord};
pub use layout::{compute_layout, normalize_angle, segment_angle, segment_mid_angle, Segment};
pub use participant::{parse_import, Participant, ParticipantId, Roster, MAX_NAME_LEN};
pub use partition::{
    partition, Group, PairingRule, PartitionResult, PrefixPairing, RevealProgress, RevealStep,
    GROUP_REVEAL_STEP_MS,
};
pub use seed::{generate_seed, is_valid_seed, SeededRandom, SpinSeed, SpinSeedError, SEED_ALPHABET, SEED_LEN};
pub use settings::{DrawMode, Theme};
pub use wheel::{spin, winner_index, SpinOutcome, SpinState, SPIN_DURATION_MS};
