use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MAX_NAME_LEN: usize = 20;
pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const DEFAULT_NAMES: [&str; 5] = ["Andi", "Budi", "Citra", "Dika", "Eka"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl Participant {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
            weight: DEFAULT_WEIGHT,
        }
    }
}

pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let found = trimmed.chars().count();
    if found > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_LEN,
            found,
        });
    }
    Ok(trimmed.to_string())
}

/// Parses pasted text into names that are new to `existing`, keeping the first casing seen.
/// Lines that are not valid names (blank or too long) are left out.
pub fn parse_import<'a, I>(text: &str, existing: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<String> = existing
        .into_iter()
        .map(|name| name.trim().to_lowercase())
        .collect();
    let mut names = Vec::new();
    for line in text.lines() {
        let Ok(name) = validate_name(line) else {
            continue;
        };
        if seen.insert(name.to_lowercase()) {
            names.push(name);
        }
    }
    names
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    pub fn new(members: Vec<Participant>) -> Self {
        Self { members }
    }

    pub fn with_defaults() -> Self {
        let members = DEFAULT_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| Participant::new(idx as u64 + 1, *name))
            .collect();
        Self { members }
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.name.as_str())
    }

    pub fn contains_name(&self, name: &str, except: Option<ParticipantId>) -> bool {
        let lower = name.to_lowercase();
        self.members
            .iter()
            .filter(|member| Some(member.id) != except)
            .any(|member| member.name.to_lowercase() == lower)
    }

    pub fn next_id(&self) -> ParticipantId {
        let max = self.members.iter().map(|member| member.id.0).max().unwrap_or(0);
        ParticipantId(max + 1)
    }

    pub fn add(&mut self, raw_name: &str) -> Result<&Participant, ValidationError> {
        let name = validate_name(raw_name)?;
        if self.contains_name(&name, None) {
            return Err(ValidationError::DuplicateName { name });
        }
        let id = self.next_id();
        self.members.push(Participant {
            id,
            name,
            weight: DEFAULT_WEIGHT,
        });
        Ok(&self.members[self.members.len() - 1])
    }

    pub fn rename(&mut self, id: ParticipantId, raw_name: &str) -> Result<(), ValidationError> {
        let name = validate_name(raw_name)?;
        if self.contains_name(&name, Some(id)) {
            return Err(ValidationError::DuplicateName { name });
        }
        let member = self
            .members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(ValidationError::UnknownParticipant { id })?;
        member.name = name;
        Ok(())
    }

    pub fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        let idx = self.members.iter().position(|member| member.id == id)?;
        Some(self.members.remove(idx))
    }

    /// Puts back a previously removed participant at the end of the roster.
    pub fn restore(&mut self, participant: Participant) -> bool {
        if self.get(participant.id).is_some() || self.contains_name(&participant.name, None) {
            return false;
        }
        self.members.push(participant);
        true
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn import_preview(&self, text: &str) -> Vec<String> {
        parse_import(text, self.names())
    }

    /// Adds exactly the names `import_preview` lists for `text`.
    pub fn import(&mut self, text: &str) -> Vec<ParticipantId> {
        let mut added = Vec::new();
        for name in self.import_preview(text) {
            let id = self.next_id();
            self.members.push(Participant {
                id,
                name,
                weight: DEFAULT_WEIGHT,
            });
            added.push(id);
        }
        added
    }
}
