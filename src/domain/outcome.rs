//! Operation outcomes and the messages accumulated while dispatching events

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Result status of a mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    Success,
    /// A listener vetoed the operation; storage was left untouched
    Cancelled,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoticeKind {
    #[default]
    Default,
    Info,
    Error,
    Success,
    Warning,
}

/// Informational message a listener attaches to an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub category: String,
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(category: impl Into<String>, text: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            kind,
        }
    }
}

/// Message set shared by every listener of one operation.
///
/// Listeners only get `&` access to event args, so the set is interior-mutable.
#[derive(Debug, Default)]
pub struct EventMessages {
    notices: Mutex<Vec<Notice>>,
}

impl EventMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, notice: Notice) {
        self.lock().push(notice);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        // A panicking listener must not hide the messages of the others
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// What a save or delete ended with, plus any listener messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub status: OperationStatus,
    pub messages: Vec<Notice>,
}

impl OperationOutcome {
    pub fn success(messages: EventMessages) -> Self {
        Self {
            status: OperationStatus::Success,
            messages: messages.into_notices(),
        }
    }

    pub fn cancelled(messages: EventMessages) -> Self {
        Self {
            status: OperationStatus::Cancelled,
            messages: messages.into_notices(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OperationStatus::Cancelled
    }
}
