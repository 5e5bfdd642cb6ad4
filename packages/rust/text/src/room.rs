//! Room-identifier handling.
//!
//! VPIS prefixes every room number with a two-letter location code and a
//! hyphen (`Is-H409`). Once a query is scoped to a location the prefix is
//! redundant, so rooms are keyed by the lower-cased remainder.

use std::sync::LazyLock;

use occupancy_shared::{OccupancyError, Result};
use regex::Regex;

static ROOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}-(.+)$").expect("room regex"));

/// Strip the location prefix from a scraped room identifier and lower-case it.
///
/// Fails with [`OccupancyError::MalformedRoomIdentifier`] when the prefix is missing.
pub fn room_key(raw: &str) -> Result<String> {
    ROOM_RE
        .captures(raw.trim())
        .map(|caps| caps[1].to_lowercase())
        .ok_or_else(|| OccupancyError::MalformedRoomIdentifier {
            room: raw.to_string(),
        })
}

/// Room key for user input, which may or may not carry the prefix.
pub fn room_key_lenient(input: &str) -> String {
    room_key(input).unwrap_or_else(|_| input.trim().to_lowercase())
}
