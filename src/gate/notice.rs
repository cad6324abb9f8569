//! Replies sent to the actor of a block command.

use std::fmt;

/// What a block command operated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Keyword,
    User,
    Channel,
}

impl Subject {
    fn label(self) -> &'static str {
        match self {
            Subject::Keyword => "keyword",
            Subject::User => "user ID",
            Subject::Channel => "channel ID",
        }
    }
}

/// Where a keyword or user entry lives, for reply wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Channel,
    Global,
}

impl Reach {
    fn list(self) -> &'static str {
        match self {
            Reach::Channel => "the block list",
            Reach::Global => "the global block list",
        }
    }
}

/// Outcome of a block command, rendered as the reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    MissingArgument(Subject),
    AlreadyBlocked { subject: Subject, value: String, reach: Reach },
    Blocked { subject: Subject, value: String, reach: Reach },
    NotBlocked { subject: Subject, value: String, reach: Reach },
    Unblocked { subject: Subject, value: String, reach: Reach },
    CannotTargetSelf,
    InsufficientAuthority { required: u8 },
    Failed,
}

impl Notice {
    /// Stable label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Notice::MissingArgument(_) => "missing_argument",
            Notice::AlreadyBlocked { .. } => "already_blocked",
            Notice::Blocked { .. } => "blocked",
            Notice::NotBlocked { .. } => "not_blocked",
            Notice::Unblocked { .. } => "unblocked",
            Notice::CannotTargetSelf => "cannot_target_self",
            Notice::InsufficientAuthority { .. } => "insufficient_authority",
            Notice::Failed => "failed",
        }
    }

    /// Whether the command changed stored state.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Notice::Blocked { .. } | Notice::Unblocked { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingArgument(subject) => {
                write!(f, "Please provide a valid {}.", subject.label())
            }
            Notice::AlreadyBlocked { subject, value, reach } => {
                write!(
                    f,
                    "The {} \"{}\" is already in {}.",
                    subject.label(),
                    value,
                    reach.list()
                )
            }
            Notice::Blocked { subject, value, reach } => {
                write!(
                    f,
                    "The {} \"{}\" has been added to {}.",
                    subject.label(),
                    value,
                    reach.list()
                )
            }
            Notice::NotBlocked { subject, value, reach } => {
                write!(
                    f,
                    "The {} \"{}\" is not in {}.",
                    subject.label(),
                    value,
                    reach.list()
                )
            }
            Notice::Unblocked { subject, value, reach } => {
                write!(
                    f,
                    "The {} \"{}\" has been removed from {}.",
                    subject.label(),
                    value,
                    reach.list()
                )
            }
            Notice::CannotTargetSelf => {
                f.write_str("You cannot perform this operation on yourself.")
            }
            Notice::InsufficientAuthority { required } => {
                write!(f, "This command requires authority level {}.", required)
            }
            Notice::Failed => f.write_str("The operation failed. Please try again later."),
        }
    }
}
