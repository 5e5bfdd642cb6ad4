//! Core domain types: academic terms, scraped activity records, occupancy slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OccupancyError;

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// Season half of an academic term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Sommersemester, token prefix `SS`.
    Summer,
    /// Wintersemester, token prefix `WS`.
    Winter,
}

impl Season {
    /// Two-letter token prefix used in VPIS URLs.
    pub fn prefix(self) -> &'static str {
        match self {
            Season::Summer => "SS",
            Season::Winter => "WS",
        }
    }
}

/// An academic term as it appears in VPIS URLs, e.g. `SS2021` or `WS2021`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term {
    pub season: Season,
    pub year: u16,
}

impl Term {
    pub fn summer(year: u16) -> Self {
        Self {
            season: Season::Summer,
            year,
        }
    }

    pub fn winter(year: u16) -> Self {
        Self {
            season: Season::Winter,
            year,
        }
    }

    /// Both terms starting in `year`, summer first.
    pub fn both_in(year: u16) -> [Term; 2] {
        [Term::summer(year), Term::winter(year)]
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", self.season.prefix(), self.year)
    }
}

impl FromStr for Term {
    type Err = OccupancyError;

    /// Parse `SS2021` / `ws2021` (case-insensitive, exactly four year digits).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let invalid = || {
            OccupancyError::validation(format!(
                "invalid semester '{s}': expected SS<yyyy> or WS<yyyy>"
            ))
        };

        if token.len() != 6 || !token.is_ascii() {
            return Err(invalid());
        }
        let (prefix, year) = token.split_at(2);
        let season = match prefix {
            "SS" => Season::Summer,
            "WS" => Season::Winter,
            _ => return Err(invalid()),
        };
        if !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;

        Ok(Self { season, year })
    }
}

// ---------------------------------------------------------------------------
// ActivityRecord
// ---------------------------------------------------------------------------

/// One date/time entry of an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDate {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Begin time, `HH:MM`.
    pub begin: String,
    /// End time, `HH:MM`.
    pub end: String,
}

/// One `<activity>` of the VPIS activities document.
///
/// The cross product `rooms × dates` is the set of occupancy slots the
/// record contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Raw course name as scraped.
    pub name: String,
    /// Activity type, e.g. `Vorlesung` or `Praktikum`.
    pub kind: String,
    pub dates: Vec<ActivityDate>,
    /// Room identifiers with their location prefix, e.g. `Is-H409`.
    pub rooms: Vec<String>,
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// What occupies a slot, apart from its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub end: String,
}

/// A flattened occupancy fact: `(room, date, begin) -> course + detail`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Slot {
    /// Local room key (prefix stripped, lower-case).
    pub room: String,
    pub date: String,
    pub begin: String,
    /// Normalized course name.
    pub course: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub end: String,
}

impl Slot {
    pub fn detail(&self) -> SlotDetail {
        SlotDetail {
            kind: self.kind.clone(),
            end: self.end.clone(),
        }
    }
}
