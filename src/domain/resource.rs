//! Remote collections the plugin can browse.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A remote collection backed by one of the two public APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// NoteHub notes: searchable, paginated, creatable and deletable.
    Notes,
    /// TMDB movie search results: read-only.
    Movies,
}

impl ResourceKind {
    /// All kinds, in the order `Tab` cycles through them.
    pub const ALL: [Self; 2] = [Self::Notes, Self::Movies];

    /// Lowercase identifier used in config and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Movies => "movies",
        }
    }

    /// Human-readable title for the header bar.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Notes => "Notes",
            Self::Movies => "Movies",
        }
    }

    /// Whether create and delete are available for this collection.
    #[must_use]
    pub const fn supports_mutations(self) -> bool {
        matches!(self, Self::Notes)
    }

    /// Whether a query without a search term is disabled.
    ///
    /// TMDB's search endpoint rejects empty queries, so a movie query only
    /// fetches once the user has typed something.
    #[must_use]
    pub const fn requires_search(self) -> bool {
        matches!(self, Self::Movies)
    }

    /// The next kind in cycling order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Notes => Self::Movies,
            Self::Movies => Self::Notes,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notes" | "note" => Ok(Self::Notes),
            "movies" | "movie" => Ok(Self::Movies),
            other => Err(format!("unknown resource '{other}'")),
        }
    }
}
