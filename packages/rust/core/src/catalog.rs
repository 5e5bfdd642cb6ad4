//! Room and course vocabularies per location.
//!
//! These enumerate every valid room number and course name so a speech
//! recognizer can be primed with them. They share the fetcher and the
//! normalizer with the occupancy query but never build an index.

use std::collections::{BTreeMap, HashSet};

use occupancy_shared::{Location, Result, Term};
use occupancy_text::{normalize_course_name, room_key};
use occupancy_vpis::{CatalogFetcher, HttpTransport};
use tracing::{info, instrument, warn};

/// Local room keys per location, first-seen order, no duplicates.
pub type RoomCatalog = BTreeMap<Location, Vec<String>>;

/// Normalized course names per location short code, first-seen order, no duplicates.
pub type CourseCatalog = BTreeMap<&'static str, Vec<String>>;

/// Appends values not seen before, keeping first-seen order.
#[derive(Debug, Default)]
struct OrderedSet {
    seen: HashSet<String>,
    items: Vec<String>,
}

impl OrderedSet {
    fn push(&mut self, value: String) {
        if self.seen.insert(value.clone()) {
            self.items.push(value);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Enumerate the rooms of every supported location listed in the control document.
///
/// Any failing fetch aborts the build.
#[instrument(skip_all)]
pub async fn build_room_catalog<T: HttpTransport>(
    fetcher: &CatalogFetcher<T>,
) -> Result<RoomCatalog> {
    let control = fetcher.fetch_control_document().await?;

    let mut rooms: BTreeMap<Location, OrderedSet> = BTreeMap::new();
    for (location, href) in control.supported() {
        let listing = fetcher.fetch_room_listing(href).await?;
        let set = rooms.entry(location).or_default();
        for raw in &listing {
            set.push(room_key(raw)?);
        }
        info!(%location, rooms = set.items.len(), "room listing fetched");
    }

    Ok(rooms.into_iter().map(|(l, set)| (l, set.into_vec())).collect())
}

/// Enumerate course names of every location over both terms of `year`.
///
/// A term whose listing cannot be fetched is skipped; the other term still
/// counts. A location appears in the result if at least one term succeeded.
#[instrument(skip_all, fields(year = year))]
pub async fn build_course_catalog<T: HttpTransport>(
    fetcher: &CatalogFetcher<T>,
    year: u16,
) -> Result<CourseCatalog> {
    let mut catalog = CourseCatalog::new();

    for location in Location::ALL {
        let mut courses: Option<OrderedSet> = None;

        for term in Term::both_in(year) {
            let names = match fetcher.fetch_course_listing(location, term).await {
                Ok(names) => names,
                Err(e) if e.is_connectivity() => {
                    warn!(
                        %location,
                        %term,
                        error = %e,
                        "course listing unavailable, skipping term"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let set = courses.get_or_insert_with(OrderedSet::default);
            for name in &names {
                set.push(normalize_course_name(name));
            }
        }

        if let Some(set) = courses {
            info!(%location, courses = set.items.len(), "course listing collected");
            catalog.insert(location.short_code(), set.into_vec());
        }
    }

    Ok(catalog)
}
