use std::fmt;

use serde::{Deserialize, Serialize};

/// The status tag carried by a managed object in a delta tree.
///
/// `None` means "no change requested": such an object is only emitted as
/// part of another object's path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    None,
    Created,
    Modified,
    Deleted,
    CreatedModified,
}

impl Action {
    /// Wire form of the status tag. `None` has no wire form.
    pub fn status(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Created => Some("created"),
            Self::Modified => Some("modified"),
            Self::Deleted => Some("deleted"),
            Self::CreatedModified => Some("created,modified"),
        }
    }

    /// Parse a wire status tag. Unknown or empty tags map to `None`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "created" => Self::Created,
            "modified" => Self::Modified,
            "deleted" => Self::Deleted,
            "created,modified" | "modified,created" => Self::CreatedModified,
            _ => Self::None,
        }
    }

    /// Whether this action brings the whole subtree into existence.
    pub fn creates(self) -> bool {
        matches!(self, Self::Created | Self::CreatedModified)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().unwrap_or("none"))
    }
}
