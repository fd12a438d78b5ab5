//! Session state for the gacha wheel: roster, spins, history, groups and
//! preferences, persisted through a pluggable key/value store.

pub mod app_core;
pub mod clock;
pub mod persisted;
pub mod persisted_store;
pub mod sound;

pub use app_core::{GroupsSnapshot, PendingSpin, Session, SessionEvent, SpinResult};
pub use clock::{Clock, ManualClock, SystemClock};
pub use persisted::Preferences;
pub use persisted_store::{FileStorage, MemoryStorage, Storage, StoreError};
pub use sound::{Silent, SoundError, SoundPort};
