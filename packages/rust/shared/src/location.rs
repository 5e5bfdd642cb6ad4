//! Campus locations and alias resolution.
//!
//! Spoken queries name a campus in many ways (city, street, abbreviation,
//! "campus X"). Every alias maps to exactly one of five canonical
//! locations; each canonical location has a short code used in VPIS
//! request parameters.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Serialize, Serializer};

use crate::error::{OccupancyError, Result};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// One of the supported campus locations.
///
/// "Im Alten Holz" (Hagen) is not listed: VPIS rejects queries for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Iserlohn,
    Hagen,
    Luedenscheid,
    Meschede,
    Soest,
}

impl Location {
    /// All canonical locations, in catalog order.
    pub const ALL: [Location; 5] = [
        Location::Iserlohn,
        Location::Hagen,
        Location::Luedenscheid,
        Location::Meschede,
        Location::Soest,
    ];

    /// Canonical name, exactly as it appears as a label in the control document.
    pub fn name(self) -> &'static str {
        match self {
            Location::Iserlohn => "Iserlohn",
            Location::Hagen => "Hagen",
            Location::Luedenscheid => "Lüdenscheid",
            Location::Meschede => "Meschede",
            Location::Soest => "Soest",
        }
    }

    /// VPIS short code (`Fachbereich` request parameter).
    pub fn short_code(self) -> &'static str {
        match self {
            Location::Iserlohn => "Is",
            Location::Hagen => "Ha",
            Location::Luedenscheid => "Ls",
            Location::Meschede => "Me",
            Location::Soest => "So",
        }
    }

    /// Look up a location by its canonical name (control-document label).
    pub fn from_name(name: &str) -> Option<Location> {
        Location::ALL.into_iter().find(|l| l.name() == name.trim())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Alias groups, lower-case. Expanded into [`ALIASES`] at first use.
const ALIAS_GROUPS: &[(Location, &[&str])] = &[
    (
        Location::Iserlohn,
        &[
            "iserlohn",
            "is",
            "frauenstuhlweg",
            "frauenstuhl weg",
            "campus iserlohn",
        ],
    ),
    (
        Location::Hagen,
        &[
            "hagen",
            "ha",
            "haldener strasse",
            "haldener straße",
            "haldener str",
            "campus hagen",
        ],
    ),
    (
        Location::Luedenscheid,
        &[
            "lüdenscheid",
            "luedenscheid",
            "ls",
            "bahnhofsallee",
            "campus luedenscheid",
            "campus lüdenscheid",
        ],
    ),
    (
        Location::Meschede,
        &[
            "meschede",
            "me",
            "lindenstrasse",
            "lindenstraße",
            "linden straße",
            "linden strasse",
            "linden str",
            "campus meschede",
        ],
    ),
    (
        Location::Soest,
        &[
            "soest",
            "so",
            "lübecker ring",
            "luebecker ring",
            "campus soest",
        ],
    ),
];

static ALIASES: LazyLock<HashMap<&'static str, Location>> = LazyLock::new(|| {
    ALIAS_GROUPS
        .iter()
        .flat_map(|(location, aliases)| aliases.iter().map(move |alias| (*alias, *location)))
        .collect()
});

/// Resolve a free-text location alias (case-insensitive) to its canonical location.
pub fn resolve_location(alias: &str) -> Result<Location> {
    let key = alias.trim().to_lowercase();
    ALIASES
        .get(key.as_str())
        .copied()
        .ok_or_else(|| OccupancyError::UnknownLocation {
            alias: alias.to_string(),
        })
}

/// All aliases that resolve to `location` (for building location vocabularies).
pub fn aliases_for(location: Location) -> Vec<&'static str> {
    ALIAS_GROUPS
        .iter()
        .filter(|(l, _)| *l == location)
        .flat_map(|(_, aliases)| aliases.iter().copied())
        .collect()
}
