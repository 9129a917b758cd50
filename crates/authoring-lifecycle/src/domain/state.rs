//! Publication states and transition kinds
//!
//! State Machine (every state may be requested from every other state):
//! ```text
//!                ┌──────────────── simple: set state + ledger + log ───────────────┐
//!   [ENROLLED] ──┤  pending | approved | staged | enrolled | unpublished | obsolete │
//!       │        └─────────────────────────────────────────────────────────────────┘
//!       ├── draft ──────→ persist first, ledger reset to lifecycle's first state
//!       ├── published ──→ prune history, check in live snapshot, ledger = {live, own}
//!       └── archived ───→ live pointer cleared ("")
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of workflow states understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    Enrolled,
    Draft,
    Pending,
    Approved,
    Staged,
    Published,
    Unpublished,
    Archived,
    Obsolete,
}

/// States advertised to editors, in display order.
pub const POSSIBLE_STATES: [PublicationState; 6] = [
    PublicationState::Enrolled,
    PublicationState::Draft,
    PublicationState::Pending,
    PublicationState::Published,
    PublicationState::Obsolete,
    PublicationState::Archived,
];

impl PublicationState {
    /// Canonical persisted name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationState::Enrolled => "enrolled",
            PublicationState::Draft => "draft",
            PublicationState::Pending => "pending",
            PublicationState::Approved => "approved",
            PublicationState::Staged => "staged",
            PublicationState::Published => "published",
            PublicationState::Unpublished => "unpublished",
            PublicationState::Archived => "archived",
            PublicationState::Obsolete => "obsolete",
        }
    }

    /// Parse a requested state name.
    ///
    /// `enrolled`, `draft`, `unpublished`, `obsolete` and `archived` match
    /// case-insensitively; `pending`, `approved`, `staged` and `published`
    /// only match their exact lowercase spelling.
    pub fn parse(name: &str) -> Option<Self> {
        const EXACT: [PublicationState; 4] = [
            PublicationState::Pending,
            PublicationState::Approved,
            PublicationState::Staged,
            PublicationState::Published,
        ];
        const RELAXED: [PublicationState; 5] = [
            PublicationState::Enrolled,
            PublicationState::Draft,
            PublicationState::Unpublished,
            PublicationState::Obsolete,
            PublicationState::Archived,
        ];

        EXACT
            .into_iter()
            .find(|state| state.as_str() == name)
            .or_else(|| {
                RELAXED
                    .into_iter()
                    .find(|state| state.as_str().eq_ignore_ascii_case(name))
            })
    }

    /// Transition kind recorded in the audit log when entering this state.
    pub fn transition_kind(&self) -> TransitionKind {
        match self {
            PublicationState::Enrolled => TransitionKind::EnrolledToLifecycle,
            PublicationState::Draft => TransitionKind::ChangeToDraft,
            PublicationState::Pending => TransitionKind::ChangeToPending,
            PublicationState::Approved => TransitionKind::ChangeToApproved,
            PublicationState::Staged => TransitionKind::ChangeToStaged,
            PublicationState::Published => TransitionKind::ChangeToLive,
            PublicationState::Unpublished => TransitionKind::ChangeToUnpublished,
            PublicationState::Archived => TransitionKind::ChangeToArchived,
            PublicationState::Obsolete => TransitionKind::ChangeToObsoleted,
        }
    }

    /// Branch of the transition engine handling this target.
    pub fn branch(&self) -> TransitionBranch {
        match self {
            PublicationState::Pending
            | PublicationState::Approved
            | PublicationState::Staged
            | PublicationState::Enrolled
            | PublicationState::Unpublished
            | PublicationState::Obsolete => TransitionBranch::StateOnly,
            PublicationState::Archived => TransitionBranch::Archive,
            PublicationState::Draft => TransitionBranch::Draft,
            PublicationState::Published => TransitionBranch::Publish,
        }
    }

    /// Archived and obsolete items keep no live revision.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PublicationState::Archived | PublicationState::Obsolete)
    }
}

impl fmt::Display for PublicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic audit-log classification of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    #[serde(rename = "enrolled-to-lifecycle")]
    EnrolledToLifecycle,
    #[serde(rename = "change-to-draft")]
    ChangeToDraft,
    #[serde(rename = "change-to-pending")]
    ChangeToPending,
    #[serde(rename = "change-to-approved")]
    ChangeToApproved,
    #[serde(rename = "change-to-staged")]
    ChangeToStaged,
    #[serde(rename = "change-to-live")]
    ChangeToLive,
    #[serde(rename = "change-to-unpublished")]
    ChangeToUnpublished,
    #[serde(rename = "change-to-archived")]
    ChangeToArchived,
    #[serde(rename = "change-to-obsoleted")]
    ChangeToObsoleted,
}

impl TransitionKind {
    const ALL: [TransitionKind; 9] = [
        TransitionKind::EnrolledToLifecycle,
        TransitionKind::ChangeToDraft,
        TransitionKind::ChangeToPending,
        TransitionKind::ChangeToApproved,
        TransitionKind::ChangeToStaged,
        TransitionKind::ChangeToLive,
        TransitionKind::ChangeToUnpublished,
        TransitionKind::ChangeToArchived,
        TransitionKind::ChangeToObsoleted,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            TransitionKind::EnrolledToLifecycle => "enrolled-to-lifecycle",
            TransitionKind::ChangeToDraft => "change-to-draft",
            TransitionKind::ChangeToPending => "change-to-pending",
            TransitionKind::ChangeToApproved => "change-to-approved",
            TransitionKind::ChangeToStaged => "change-to-staged",
            TransitionKind::ChangeToLive => "change-to-live",
            TransitionKind::ChangeToUnpublished => "change-to-unpublished",
            TransitionKind::ChangeToArchived => "change-to-archived",
            TransitionKind::ChangeToObsoleted => "change-to-obsoleted",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which part of the engine executes a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionBranch {
    /// Set state, ledger entry and log entry; no snapshot work.
    StateOnly,
    /// State-only plus clearing the live-revision pointer.
    Archive,
    /// Durable state write, then ledger reset of the working-copy entry.
    Draft,
    /// History pruning and creation of the new live snapshot.
    Publish,
}

/// A resolved transition target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionTarget {
    /// One of the fixed states.
    Known(PublicationState),
    /// A state only defined by the item's lifecycle definition.
    Custom(String),
}

impl TransitionTarget {
    /// Name written to the current-state property.
    pub fn name(&self) -> &str {
        match self {
            TransitionTarget::Known(state) => state.as_str(),
            TransitionTarget::Custom(name) => name,
        }
    }

    pub fn branch(&self) -> TransitionBranch {
        match self {
            TransitionTarget::Known(state) => state.branch(),
            TransitionTarget::Custom(_) => TransitionBranch::StateOnly,
        }
    }

    /// Custom lifecycle states have no audit classification.
    pub fn transition_kind(&self) -> Option<TransitionKind> {
        match self {
            TransitionTarget::Known(state) => Some(state.transition_kind()),
            TransitionTarget::Custom(_) => None,
        }
    }

    pub fn is(&self, state: PublicationState) -> bool {
        matches!(self, TransitionTarget::Known(known) if *known == state)
    }
}

impl fmt::Display for TransitionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
