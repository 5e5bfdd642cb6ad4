//! Activity document parser.
//!
//! ```xml
//! <vpis>
//!   <activities>
//!     <activity>
//!       <name>Programmierung mit C++2</name>
//!       <activity-type>Praktikum</activity-type>
//!       <activity-dates>
//!         <activity-date date="2021-04-12" begin="08:00" end="09:30"/>
//!       </activity-dates>
//!       <activity-locations>
//!         <activity-location>Is-H409</activity-location>
//!       </activity-locations>
//!     </activity>
//!   </activities>
//! </vpis>
//! ```

use occupancy_shared::{ActivityDate, ActivityRecord, OccupancyError, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Wire structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ActivitiesDocument {
    #[serde(rename = "activities", default)]
    groups: Vec<ActivitiesXml>,
}

#[derive(Debug, Deserialize)]
struct ActivitiesXml {
    #[serde(rename = "activity", default)]
    activities: Vec<ActivityXml>,
}

#[derive(Debug, Deserialize)]
struct ActivityXml {
    #[serde(default)]
    name: String,
    #[serde(rename = "activity-type", default)]
    activity_type: String,
    #[serde(rename = "activity-dates", default)]
    dates: Vec<ActivityDatesXml>,
    #[serde(rename = "activity-locations", default)]
    locations: Vec<ActivityLocationsXml>,
}

#[derive(Debug, Deserialize)]
struct ActivityDatesXml {
    #[serde(rename = "activity-date", default)]
    entries: Vec<ActivityDateXml>,
}

#[derive(Debug, Deserialize)]
struct ActivityDateXml {
    #[serde(rename = "@date")]
    date: String,
    #[serde(rename = "@begin")]
    begin: String,
    #[serde(rename = "@end")]
    end: String,
}

#[derive(Debug, Deserialize)]
struct ActivityLocationsXml {
    #[serde(rename = "activity-location", default)]
    rooms: Vec<String>,
}

impl From<ActivityXml> for ActivityRecord {
    fn from(xml: ActivityXml) -> Self {
        Self {
            name: xml.name.trim().to_string(),
            kind: xml.activity_type.trim().to_string(),
            dates: xml
                .dates
                .into_iter()
                .flat_map(|d| d.entries)
                .map(|d| ActivityDate {
                    date: d.date,
                    begin: d.begin,
                    end: d.end,
                })
                .collect(),
            rooms: xml
                .locations
                .into_iter()
                .flat_map(|l| l.rooms)
                .map(|r| r.trim().to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse an activities document into records, in document order.
pub fn parse_activities(xml: &str) -> Result<Vec<ActivityRecord>> {
    let doc: ActivitiesDocument = quick_xml::de::from_str(xml)
        .map_err(|e| OccupancyError::parse(format!("activities document: {e}")))?;

    Ok(doc
        .groups
        .into_iter()
        .flat_map(|g| g.activities)
        .map(ActivityRecord::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        let path = format!("../../../fixtures/vpis/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn parses_fixture() {
        let records = parse_activities(&fixture("activities.xml")).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.name, "Programmierung mit C++2");
        assert_eq!(first.kind, "Praktikum");
        assert_eq!(first.dates.len(), 3);
        assert_eq!(
            first.dates[1],
            ActivityDate {
                date: "2021-04-12".into(),
                begin: "09:45".into(),
                end: "11:15".into(),
            }
        );
        assert_eq!(first.rooms, ["Is-H409"]);

        assert_eq!(records[1].rooms, ["Is-ZE04", "Is-H409"]);
        assert_eq!(records[2].kind, "Übung");
    }

    #[test]
    fn empty_activities_element() {
        assert!(parse_activities("<vpis><activities/></vpis>").unwrap().is_empty());
        assert!(
            parse_activities("<vpis><activities></activities></vpis>")
                .unwrap()
                .is_empty()
        );
        assert!(parse_activities("<vpis/>").unwrap().is_empty());
    }

    #[test]
    fn activity_without_dates_or_rooms() {
        let xml = "<vpis><activities><activity><name>Kolloquium</name></activity></activities></vpis>";
        let records = parse_activities(xml).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].dates.is_empty());
        assert!(records[0].rooms.is_empty());
        assert_eq!(records[0].kind, "");
    }

    #[test]
    fn escaped_entities_are_decoded() {
        let xml = "<vpis><activities><activity><name>Recht &amp; Ethik</name></activity></activities></vpis>";
        let records = parse_activities(xml).unwrap();
        assert_eq!(records[0].name, "Recht & Ethik");
    }

    #[test]
    fn missing_date_attribute_is_parse_error() {
        let xml = r#"<vpis><activities><activity><name>X</name>
            <activity-dates><activity-date date="2021-04-12" begin="08:00"/></activity-dates>
            </activity></activities></vpis>"#;
        let err = parse_activities(xml).unwrap_err();
        assert!(matches!(err, OccupancyError::Parse { .. }));
    }
}
