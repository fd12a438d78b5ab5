use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::persisted::{Preferences, HISTORY_KEY, LAST_REMOVED_KEY, MEMBERS_KEY};
use crate::persisted_store::{load_state, save, save_preferences, Storage};
use crate::sound::{group_tick_hz, SoundPort, FANFARE_NOTES_HZ, SPIN_TICK_HZ};
use gacha_wheel_core::colors::{parse_palette, retro_palette, shuffle_palette, wheel_colors, RETRO_COLORS};
use gacha_wheel_core::export::{groups_file_name, groups_text, history_file_name, history_text};
use gacha_wheel_core::{
    compute_layout, format_utc, generate_seed, partition, DrawMode, History, HistoryRecord,
    PairingRule, Participant, ParticipantId, PartitionResult, Roster, Segment, SpinSeed,
    SpinState, Theme, ValidationError, SPIN_DURATION_MS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RosterChanged,
    HistoryChanged,
    PreferencesChanged,
    SpinStarted,
    SpinRevealed,
    GroupsChanged,
}

pub type SessionSubscriber = Box<dyn FnMut(SessionEvent)>;

/// A spin whose winner is decided but not yet shown.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSpin {
    pub target_rotation: f64,
    pub started_at_ms: i64,
    pub reveal_at_ms: i64,
    pub seed: SpinSeed,
    winner_index: usize,
    winner: Participant,
}

impl PendingSpin {
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.reveal_at_ms - now_ms).max(0)
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        now_ms >= self.reveal_at_ms
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinResult {
    pub winner: Participant,
    pub winner_index: usize,
    pub rotation: f64,
    pub record: HistoryRecord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupsSnapshot {
    pub result: PartitionResult,
    pub generated_at_ms: i64,
}

pub struct Session<S, A, C> {
    storage: S,
    sound: A,
    clock: C,
    roster: Roster,
    history: History,
    preferences: Preferences,
    spin: SpinState,
    pending: Option<PendingSpin>,
    last_winner: Option<ParticipantId>,
    last_removed: Option<Participant>,
    groups: Option<GroupsSnapshot>,
    subscribers: Vec<SessionSubscriber>,
}

impl<S, A, C> Session<S, A, C>
where
    S: Storage,
    A: SoundPort,
    C: Clock,
{
    pub fn load(storage: S, sound: A, clock: C) -> Self {
        let state = load_state(&storage);
        debug!(
            members = state.roster.len(),
            history = state.history.len(),
            mode = %state.preferences.mode,
            "session loaded"
        );
        Self {
            storage,
            sound,
            clock,
            roster: state.roster,
            history: state.history,
            preferences: state.preferences,
            spin: SpinState::default(),
            pending: None,
            last_winner: None,
            last_removed: state.last_removed,
            groups: None,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: SessionSubscriber) {
        self.subscribers.push(subscriber);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn spin_state(&self) -> SpinState {
        self.spin
    }

    pub fn pending_spin(&self) -> Option<&PendingSpin> {
        self.pending.as_ref()
    }

    pub fn last_removed(&self) -> Option<&Participant> {
        self.last_removed.as_ref()
    }

    pub fn groups(&self) -> Option<&GroupsSnapshot> {
        self.groups.as_ref()
    }

    pub fn layout(&self) -> Vec<Segment> {
        compute_layout(self.roster.len())
    }

    pub fn wheel_colors(&self) -> Vec<String> {
        let count = self.roster.len();
        if self.preferences.color_locked && !self.preferences.custom_colors.is_empty() {
            wheel_colors(count, &self.preferences.custom_colors)
        } else {
            wheel_colors(count, &RETRO_COLORS)
        }
    }

    // roster

    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, ValidationError> {
        let id = self.roster.add(name)?.id;
        info!(%id, name = name.trim(), "participant added");
        self.roster_changed();
        Ok(id)
    }

    pub fn rename_participant(&mut self, id: ParticipantId, name: &str) -> Result<(), ValidationError> {
        self.roster.rename(id, name)?;
        self.roster_changed();
        Ok(())
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        let removed = self.roster.remove(id)?;
        self.roster_changed();
        Some(removed)
    }

    pub fn clear_participants(&mut self) {
        self.roster.clear();
        self.roster_changed();
    }

    pub fn import_preview(&self, text: &str) -> Vec<String> {
        self.roster.import_preview(text)
    }

    pub fn import_names(&mut self, text: &str) -> Vec<ParticipantId> {
        let added = self.roster.import(text);
        if !added.is_empty() {
            info!(count = added.len(), "participants imported");
            self.roster_changed();
        }
        added
    }

    // spinning

    /// Starts a spin. Returns `None` while another spin is in flight or with fewer than two participants.
    pub fn request_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&PendingSpin> {
        if self.pending.is_some() {
            debug!("spin ignored: already spinning");
            return None;
        }
        let count = self.roster.len();
        let outcome = self.spin.begin(rng, count)?;
        let Some(winner) = self.roster.members().get(outcome.winner_index).cloned() else {
            self.spin.finish();
            return None;
        };
        let seed = generate_seed(rng);
        let now = self.clock.now_ms();
        debug!(rotation = outcome.new_rotation, %seed, "spin started");
        self.pending = Some(PendingSpin {
            target_rotation: outcome.new_rotation,
            started_at_ms: now,
            reveal_at_ms: now + SPIN_DURATION_MS,
            seed,
            winner_index: outcome.winner_index,
            winner,
        });
        self.play_spin_tick();
        self.notify(SessionEvent::SpinStarted);
        self.pending.as_ref()
    }

    /// Reveals the pending spin once its animation time has elapsed.
    pub fn complete_spin(&mut self) -> Option<SpinResult> {
        let now = self.clock.now_ms();
        if !self.pending.as_ref()?.is_due(now) {
            return None;
        }
        let pending = self.pending.take()?;
        self.spin.finish();
        let record = HistoryRecord::new(&pending.winner, now, pending.seed.clone());
        self.history.push(record.clone());
        self.last_winner = Some(pending.winner.id);
        info!(winner = %pending.winner.name, seed = %pending.seed, "spin revealed");
        self.persist_history();
        if self.preferences.sound_enabled {
            self.play(|sound| sound.play_fanfare(&FANFARE_NOTES_HZ));
        }
        self.notify(SessionEvent::SpinRevealed);
        self.notify(SessionEvent::HistoryChanged);
        Some(SpinResult {
            winner: pending.winner,
            winner_index: pending.winner_index,
            rotation: pending.target_rotation,
            record,
        })
    }

    pub fn play_spin_tick(&mut self) {
        if self.preferences.sound_enabled {
            self.play(|sound| sound.play_tick(SPIN_TICK_HZ));
        }
    }

    /// Takes the latest winner off the wheel. Only class mode removes winners.
    pub fn remove_winner(&mut self) -> Option<Participant> {
        if !self.preferences.mode.removes_winner() {
            return None;
        }
        let id = self.last_winner.take()?;
        let removed = self.roster.remove(id)?;
        debug!(%id, "winner removed");
        self.last_removed = Some(removed.clone());
        self.persist_last_removed();
        self.roster_changed();
        Some(removed)
    }

    pub fn undo(&mut self) -> Option<HistoryRecord> {
        let record = self.history.undo()?;
        self.last_winner = None;
        let matches_record = self.preferences.mode.removes_winner()
            && self
                .last_removed
                .as_ref()
                .is_some_and(|member| member.id == record.winner_participant_id);
        let mut restored = false;
        if matches_record {
            if let Some(member) = self.last_removed.take() {
                restored = self.roster.restore(member);
                if restored {
                    self.roster_changed();
                }
            }
            self.persist_last_removed();
        }
        info!(winner = %record.winner_name, restored, "spin undone");
        self.persist_history();
        self.notify(SessionEvent::HistoryChanged);
        Some(record)
    }

    pub fn reset_history(&mut self) {
        self.history.reset();
        self.last_removed = None;
        self.last_winner = None;
        self.persist_last_removed();
        self.persist_history();
        self.notify(SessionEvent::HistoryChanged);
    }

    // preferences

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.update_preferences(|prefs| prefs.mode = mode);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.update_preferences(|prefs| prefs.theme = theme);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.update_preferences(|prefs| prefs.sound_enabled = enabled);
    }

    pub fn set_color_locked(&mut self, locked: bool) {
        self.update_preferences(|prefs| prefs.color_locked = locked);
    }

    pub fn set_custom_colors<T: AsRef<str>>(&mut self, colors: &[T]) -> Result<(), ValidationError> {
        let palette = parse_palette(colors)?;
        self.update_preferences(|prefs| prefs.custom_colors = palette);
        Ok(())
    }

    pub fn shuffle_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let palette = shuffle_palette(rng, &retro_palette());
        self.update_preferences(|prefs| prefs.custom_colors = palette);
    }

    // groups

    pub fn partition_groups<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        group_count: usize,
        pairing: Option<&dyn PairingRule>,
    ) -> Result<&GroupsSnapshot, ValidationError> {
        let result = partition(rng, self.roster.members(), group_count, pairing)?;
        info!(
            members = result.total(),
            groups = result.group_count(),
            paired = result.paired.is_some(),
            "groups partitioned"
        );
        let snapshot = GroupsSnapshot {
            result,
            generated_at_ms: self.clock.now_ms(),
        };
        self.notify(SessionEvent::GroupsChanged);
        let stored = self.groups.insert(snapshot);
        Ok(&*stored)
    }

    pub fn play_reveal_step(&mut self, group_index: usize) {
        if self.preferences.sound_enabled {
            self.play(|sound| sound.play_tick(group_tick_hz(group_index)));
        }
    }

    pub fn play_reveal_done(&mut self) {
        if self.preferences.sound_enabled {
            self.play(|sound| sound.play_fanfare(&FANFARE_NOTES_HZ));
        }
    }

    // export

    pub fn history_export_text(&self) -> Option<(String, String)> {
        if self.history.is_empty() {
            return None;
        }
        let text = history_text(self.history.records(), format_utc);
        Some((history_file_name(self.clock.now_ms()), text))
    }

    pub fn group_export_text(&self) -> Option<(String, String)> {
        let snapshot = self.groups.as_ref()?;
        let text = groups_text(&snapshot.result, snapshot.generated_at_ms, format_utc);
        Some((groups_file_name(self.clock.now_ms()), text))
    }

    fn play<F>(&mut self, cue: F)
    where
        F: FnOnce(&mut A) -> Result<(), crate::sound::SoundError>,
    {
        if let Err(err) = cue(&mut self.sound) {
            debug!(error = %err, "sound cue skipped");
        }
    }

    fn update_preferences<F>(&mut self, update: F)
    where
        F: FnOnce(&mut Preferences),
    {
        update(&mut self.preferences);
        if let Err(err) = save_preferences(&mut self.storage, &self.preferences) {
            warn!(error = %err, "failed to persist preferences");
        }
        self.notify(SessionEvent::PreferencesChanged);
    }

    fn roster_changed(&mut self) {
        if let Err(err) = save(&mut self.storage, MEMBERS_KEY, &self.roster) {
            warn!(error = %err, "failed to persist members");
        }
        self.notify(SessionEvent::RosterChanged);
    }

    fn persist_history(&mut self) {
        if let Err(err) = save(&mut self.storage, HISTORY_KEY, &self.history) {
            warn!(error = %err, "failed to persist history");
        }
    }

    fn persist_last_removed(&mut self) {
        if let Err(err) = save(&mut self.storage, LAST_REMOVED_KEY, &self.last_removed) {
            warn!(error = %err, "failed to persist removed winner");
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}
