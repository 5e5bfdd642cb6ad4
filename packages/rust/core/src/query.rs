//! End-to-end occupancy query: alias → control document → activities → index.

use std::time::Instant;

use occupancy_index::{IndexStatus, OccupancyIndex, build_index};
use occupancy_shared::{Location, Result, Slot, Term, resolve_location};
use occupancy_text::{normalize_course_name, room_key_lenient};
use occupancy_vpis::{CatalogFetcher, HttpTransport};
use serde::Serialize;
use tracing::{info, instrument};

/// What the caller asks for, as free text from the voice layer.
#[derive(Debug, Clone, Default)]
pub struct OccupancyQuery {
    /// Location alias, e.g. `iserlohn` or `campus lüdenscheid`.
    pub location: String,
    /// Semester token (`SS2021`/`WS2021`); current semester when absent.
    pub semester: Option<String>,
    /// Calendar day (`YYYY-MM-DD`); VPIS default when absent.
    pub day: Option<String>,
}

impl OccupancyQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    pub fn day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }
}

/// Result of a successful query: the resolved keys plus the dual index.
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyReport {
    pub location: Location,
    #[serde(serialize_with = "serialize_term")]
    pub semester: Option<Term>,
    pub day: Option<String>,
    pub index: OccupancyIndex,
}

impl OccupancyReport {
    /// `NoActivitiesFound` means VPIS answered with an empty schedule.
    pub fn status(&self) -> IndexStatus {
        self.index.status()
    }

    /// Slots of one room, optionally limited to one date. Accepts `H409` or `Is-H409`.
    pub fn activities_in_room(&self, room: &str, date: Option<&str>) -> Vec<Slot> {
        let key = room_key_lenient(room);
        self.index
            .room_slots()
            .into_iter()
            .filter(|s| s.room == key)
            .filter(|s| date.is_none_or(|d| s.date == d))
            .collect()
    }

    /// Slots of one course, matched on its normalized name.
    pub fn course_schedule(&self, course: &str) -> Vec<Slot> {
        let key = normalize_course_name(course);
        self.index
            .course_slots()
            .into_iter()
            .filter(|s| s.course == key)
            .collect()
    }
}

fn serialize_term<S: serde::Serializer>(
    term: &Option<Term>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match term {
        Some(term) => serializer.collect_str(term),
        None => serializer.serialize_none(),
    }
}

/// Run one occupancy query.
///
/// Input is validated before any request is sent. Every fetch or parse
/// failure aborts the query; no partial index is returned.
#[instrument(skip_all, fields(location = %query.location))]
pub async fn query_occupancy<T: HttpTransport>(
    fetcher: &CatalogFetcher<T>,
    query: &OccupancyQuery,
) -> Result<OccupancyReport> {
    let start = Instant::now();

    let location = resolve_location(&query.location)?;
    let semester = query
        .semester
        .as_deref()
        .map(str::parse::<Term>)
        .transpose()?;
    let day = query.day.as_deref().map(str::trim).filter(|d| !d.is_empty());

    info!(%location, semester = ?semester.map(|t| t.to_string()), day, "querying occupancy");

    let control = fetcher.fetch_control_document().await?;
    let location_url = control.resolve_location_url(location)?;
    let raw = fetcher.fetch_activities(location_url, semester, day).await?;
    let index = build_index(&raw)?;

    info!(
        rooms = index.by_room.len(),
        courses = index.by_course.len(),
        slots = index.slot_count(),
        elapsed_ms = start.elapsed().as_millis(),
        "occupancy query completed"
    );

    Ok(OccupancyReport {
        location,
        semester,
        day: day.map(str::to_string),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BASE, FakeVpis, control_xml, fixture};
    use occupancy_shared::OccupancyError;

    fn iserlohn_vpis() -> FakeVpis {
        FakeVpis::new()
            .xml(&format!("{BASE}/vpisapp.php"), &control_xml())
            .redirect(
                &format!("{BASE}/location/is"),
                &format!("{BASE}/SS2021/belegung.php3?Fachbereich=Is"),
            )
    }

    #[tokio::test]
    async fn full_query_with_semester_and_day() {
        let vpis = iserlohn_vpis().xml(
            &format!("{BASE}/WS2020/belegung.php3?Fachbereich=Is&Tag=2021-04-12"),
            &fixture("activities.xml"),
        );
        let fetcher = vpis.fetcher();

        let query = OccupancyQuery::new("Campus Iserlohn")
            .semester("ws2020")
            .day("2021-04-12");
        let report = query_occupancy(&fetcher, &query).await.unwrap();

        assert_eq!(report.location, Location::Iserlohn);
        assert_eq!(report.semester, Some(Term::winter(2020)));
        assert_eq!(report.status(), IndexStatus::Populated);
        assert_eq!(report.index.slot_count(), 6);

        let h409 = report.activities_in_room("Is-H409", Some("2021-04-12"));
        assert_eq!(h409.len(), 3);
        assert_eq!(h409[0].begin, "08:00");
        assert_eq!(h409[0].course, "programmierung mit c++2");

        let projekt = report.course_schedule("Projekt (Systemintegration)");
        let rooms: Vec<&str> = projekt.iter().map(|s| s.room.as_str()).collect();
        assert_eq!(rooms, ["h409", "ze04"]);
    }

    #[tokio::test]
    async fn request_chain_is_three_hops() {
        let vpis = iserlohn_vpis().xml(
            &format!("{BASE}/SS2021/belegung.php3?Fachbereich=Is&Tag=2021-04-19"),
            "<vpis><activities/></vpis>",
        );
        let fetcher = vpis.fetcher();

        query_occupancy(&fetcher, &OccupancyQuery::new("is").day("2021-04-19"))
            .await
            .unwrap();

        assert_eq!(
            fetcher.transport().requests(),
            [
                format!("{BASE}/vpisapp.php"),
                format!("{BASE}/location/is"),
                format!("{BASE}/SS2021/belegung.php3?Fachbereich=Is&Tag=2021-04-19"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_schedule_is_not_an_error() {
        let vpis = iserlohn_vpis().xml(
            &format!("{BASE}/SS2021/belegung.php3?Fachbereich=Is"),
            "<vpis><activities></activities></vpis>",
        );

        let report = query_occupancy(&vpis.fetcher(), &OccupancyQuery::new("iserlohn"))
            .await
            .unwrap();
        assert_eq!(report.status(), IndexStatus::NoActivitiesFound);
        assert!(report.index.by_room.is_empty());
        assert!(report.index.by_course.is_empty());
    }

    #[tokio::test]
    async fn unknown_location_sends_no_request() {
        let err = query_occupancy(&FakeVpis::new().fetcher(), &OccupancyQuery::new("im alten holz"))
            .await
            .unwrap_err();
        assert!(matches!(err, OccupancyError::UnknownLocation { .. }));
    }

    #[tokio::test]
    async fn invalid_semester_rejected() {
        let err = query_occupancy(
            &iserlohn_vpis().fetcher(),
            &OccupancyQuery::new("iserlohn").semester("Sommer"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OccupancyError::Validation { .. }));
    }

    #[tokio::test]
    async fn location_missing_from_control_document() {
        let err = query_occupancy(&iserlohn_vpis().fetcher(), &OccupancyQuery::new("soest"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OccupancyError::LocationNotInControlDocument { ref location } if location == "Soest"
        ));
    }

    #[tokio::test]
    async fn control_document_404_aborts() {
        let vpis = FakeVpis::new().status(&format!("{BASE}/vpisapp.php"), 404);
        let err = query_occupancy(&vpis.fetcher(), &OccupancyQuery::new("hagen"))
            .await
            .unwrap_err();
        assert!(matches!(err, OccupancyError::Transport { status: Some(404), .. }));
    }

    #[tokio::test]
    async fn activities_failure_returns_no_partial_index() {
        // Redirect target has no route → 404 on the final hop.
        let err = query_occupancy(&iserlohn_vpis().fetcher(), &OccupancyQuery::new("iserlohn"))
            .await
            .unwrap_err();
        assert!(err.is_connectivity());
    }

    #[test]
    fn report_serializes_semester_token() {
        let report = OccupancyReport {
            location: Location::Hagen,
            semester: Some(Term::summer(2021)),
            day: None,
            index: OccupancyIndex::default(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["location"], "Hagen");
        assert_eq!(json["semester"], "SS2021");
    }
}
