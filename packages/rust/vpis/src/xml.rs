//! XML documents served by VPIS: the control document and per-location room listings.
//!
//! Control document (root name varies, only children matter):
//! ```xml
//! <vpis>
//!   <locations href="https://vpis.example/...">Iserlohn</locations>
//!   <locations href="...">Hagen</locations>
//! </vpis>
//! ```
//!
//! Room listing:
//! ```xml
//! <vpis>
//!   <locations>
//!     <location><name>Is-H409</name></location>
//!   </locations>
//! </vpis>
//! ```

use occupancy_shared::{Location, OccupancyError, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Control document
// ---------------------------------------------------------------------------

/// One `(label, href)` pair of the control document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEntry {
    pub label: String,
    pub href: String,
}

/// The parsed control document: where each location's data lives.
#[derive(Debug, Clone, Default)]
pub struct ControlDocument {
    pub entries: Vec<ControlEntry>,
}

impl ControlDocument {
    /// Find the sub-resource URL whose label equals the location's canonical name.
    ///
    /// The control document is the live source of truth; a location the
    /// alias table supports may still be missing here.
    pub fn resolve_location_url(&self, location: Location) -> Result<&str> {
        self.entries
            .iter()
            .find(|e| e.label == location.name())
            .map(|e| e.href.as_str())
            .ok_or_else(|| OccupancyError::LocationNotInControlDocument {
                location: location.name().to_string(),
            })
    }

    /// Entries whose label is one of the supported canonical locations, in document order.
    pub fn supported(&self) -> impl Iterator<Item = (Location, &str)> {
        self.entries
            .iter()
            .filter_map(|e| Location::from_name(&e.label).map(|l| (l, e.href.as_str())))
    }
}

#[derive(Debug, Deserialize)]
struct ControlXml {
    #[serde(rename = "locations", default)]
    locations: Vec<ControlLocationXml>,
}

#[derive(Debug, Deserialize)]
struct ControlLocationXml {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "$text", default)]
    label: String,
}

/// Parse the control document.
pub fn parse_control_document(xml: &str) -> Result<ControlDocument> {
    let parsed: ControlXml = quick_xml::de::from_str(xml)
        .map_err(|e| OccupancyError::parse(format!("control document: {e}")))?;

    let entries = parsed
        .locations
        .into_iter()
        .filter(|l| !l.href.is_empty())
        .map(|l| ControlEntry {
            label: l.label.trim().to_string(),
            href: l.href.trim().to_string(),
        })
        .collect();

    Ok(ControlDocument { entries })
}

// ---------------------------------------------------------------------------
// Room listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RoomListingXml {
    #[serde(rename = "locations", default)]
    groups: Vec<RoomGroupXml>,
}

#[derive(Debug, Deserialize)]
struct RoomGroupXml {
    #[serde(rename = "location", default)]
    rooms: Vec<RoomXml>,
}

#[derive(Debug, Deserialize)]
struct RoomXml {
    #[serde(default)]
    name: String,
}

/// Parse a room listing into raw (still prefixed) room identifiers, in document order.
pub fn parse_room_listing(xml: &str) -> Result<Vec<String>> {
    let parsed: RoomListingXml = quick_xml::de::from_str(xml)
        .map_err(|e| OccupancyError::parse(format!("room listing: {e}")))?;

    Ok(parsed
        .groups
        .into_iter()
        .flat_map(|g| g.rooms)
        .map(|r| r.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<vpis>
  <locations href="https://vpis.example/is.php">Iserlohn</locations>
  <locations href="https://vpis.example/ha.php">Hagen</locations>
  <locations href="https://vpis.example/iah.php">Hagen IAH</locations>
  <locations href="https://vpis.example/ls.php">Lüdenscheid</locations>
</vpis>"#;

    #[test]
    fn parses_control_entries() {
        let doc = parse_control_document(CONTROL).unwrap();
        assert_eq!(doc.entries.len(), 4);
        assert_eq!(
            doc.entries[0],
            ControlEntry {
                label: "Iserlohn".into(),
                href: "https://vpis.example/is.php".into(),
            }
        );
    }

    #[test]
    fn resolves_location_urls() {
        let doc = parse_control_document(CONTROL).unwrap();
        assert_eq!(
            doc.resolve_location_url(Location::Luedenscheid).unwrap(),
            "https://vpis.example/ls.php"
        );
        let err = doc.resolve_location_url(Location::Soest).unwrap_err();
        assert!(matches!(
            err,
            OccupancyError::LocationNotInControlDocument { ref location } if location == "Soest"
        ));
    }

    #[test]
    fn supported_skips_unknown_labels() {
        let doc = parse_control_document(CONTROL).unwrap();
        let locations: Vec<Location> = doc.supported().map(|(l, _)| l).collect();
        assert_eq!(
            locations,
            [Location::Iserlohn, Location::Hagen, Location::Luedenscheid]
        );
    }

    #[test]
    fn parses_room_listing() {
        let xml = r#"<vpis>
  <locations>
    <location><name>Is-H409</name></location>
    <location><name> Is-ZE04 </name></location>
    <location><name></name></location>
  </locations>
</vpis>"#;
        let rooms = parse_room_listing(xml).unwrap();
        assert_eq!(rooms, ["Is-H409", "Is-ZE04"]);
    }

    #[test]
    fn malformed_xml_is_parse_error() {
        let err = parse_control_document("<vpis><locations></vpis>").unwrap_err();
        assert!(matches!(err, OccupancyError::Parse { .. }));
    }
}
