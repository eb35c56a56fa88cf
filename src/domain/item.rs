//! Item domain models: notes, movies, and the note creation payload.
//!
//! The two remote APIs disagree on field names across their versions (`_id` vs
//! `id`, `body` vs `content`, numeric vs string identifiers). The serde
//! attributes below accept every observed spelling and normalize it into one
//! shape, so the rest of the crate never sees the difference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Opaque identifier of a remote item.
///
/// Deserializes from either a JSON string or a JSON integer; both are stored as
/// text so ids can be used in URLs without caring where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Category attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteTag {
    Todo,
    Work,
    #[default]
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    /// All tags in the order the create form cycles through them.
    pub const ALL: [Self; 5] = [
        Self::Todo,
        Self::Work,
        Self::Personal,
        Self::Meeting,
        Self::Shopping,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Meeting => "Meeting",
            Self::Shopping => "Shopping",
        }
    }

    /// The tag after this one, wrapping around.
    #[must_use]
    pub fn cycle(self) -> Self {
        let position = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(position + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tag '{s}'"))
    }
}

/// A NoteHub note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(alias = "_id")]
    pub id: ItemId,
    pub title: String,
    #[serde(alias = "content", default)]
    pub body: String,
    #[serde(default)]
    pub tag: Option<NoteTag>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Returns a short "how long ago" string for the last update.
    ///
    /// Falls back to the creation time, and to an empty string when the API
    /// sent neither timestamp.
    ///
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - Otherwise: "Xd ago"
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let Some(stamp) = self.updated_at.or(self.created_at) else {
            return String::new();
        };
        let diff = (now - stamp).num_seconds().max(0);

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            format!("{}m ago", diff / SECONDS_PER_MINUTE)
        } else if diff < SECONDS_PER_DAY {
            format!("{}h ago", diff / SECONDS_PER_HOUR)
        } else {
            format!("{}d ago", diff / SECONDS_PER_DAY)
        }
    }
}

/// A TMDB movie search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Movie {
    /// Release year, if TMDB supplied a non-empty date.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|year| year.len() == 4)
    }
}

/// An entry in a fetched page.
///
/// The cache treats items as opaque; only the UI looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Note(Note),
    Movie(Movie),
}

impl Item {
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        match self {
            Self::Note(note) => &note.id,
            Self::Movie(movie) => &movie.id,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Note(note) => &note.title,
            Self::Movie(movie) => &movie.title,
        }
    }

    /// Body text for notes, overview for movies.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Note(note) => &note.body,
            Self::Movie(movie) => &movie.overview,
        }
    }

    /// Short label shown in the right-hand column.
    #[must_use]
    pub fn badge(&self, now: DateTime<Utc>) -> String {
        match self {
            Self::Note(note) => {
                let age = note.time_ago(now);
                match (note.tag, age.is_empty()) {
                    (Some(tag), false) => format!("{tag} · {age}"),
                    (Some(tag), true) => tag.to_string(),
                    (None, _) => age,
                }
            }
            Self::Movie(movie) => match movie.year() {
                Some(year) => format!("{year} · ★ {:.1}", movie.vote_average),
                None => format!("★ {:.1}", movie.vote_average),
            },
        }
    }
}

/// Payload for creating a note.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub tag: NoteTag,
}
