use crate::participant::ParticipantId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("participant name cannot be empty")]
    EmptyName,
    #[error("participant name must be at most {max} chars, got {found}")]
    NameTooLong { max: usize, found: usize },
    #[error("participant '{name}' already exists")]
    DuplicateName { name: String },
    #[error("no participant with id {id}")]
    UnknownParticipant { id: ParticipantId },
    #[error("at least {required} participants are needed, got {found}")]
    NotEnoughParticipants { required: usize, found: usize },
    #[error("group count must be at least 2, got {requested}")]
    InvalidGroupCount { requested: usize },
    #[error("at least {groups} participants are needed for {groups} groups, got {found}")]
    NotEnoughForGroups { groups: usize, found: usize },
    #[error("invalid color '{value}'")]
    InvalidColor { value: String },
}
