//! Dual occupancy index.
//!
//! Both views are filled from one scan over the records and hold exactly
//! the same slot set:
//! - `by_room:   room -> date -> begin -> course -> detail`
//! - `by_course: course -> date -> room -> begin -> detail`
//!
//! A slot is keyed by `(room, date, begin)`. When that key repeats, the
//! first record wins in both views.

use std::collections::BTreeMap;

use occupancy_shared::{ActivityDate, ActivityRecord, Result, Slot, SlotDetail};
use occupancy_text::{normalize_course_name, room_key};
use serde::Serialize;
use tracing::{debug, warn};

/// `date -> begin -> course -> detail` for one room.
pub type RoomSchedule = BTreeMap<String, BTreeMap<String, BTreeMap<String, SlotDetail>>>;

/// `date -> room -> begin -> detail` for one course.
pub type CourseSchedule = BTreeMap<String, BTreeMap<String, BTreeMap<String, SlotDetail>>>;

pub type ByRoomIndex = BTreeMap<String, RoomSchedule>;
pub type ByCourseIndex = BTreeMap<String, CourseSchedule>;

// ---------------------------------------------------------------------------
// OccupancyIndex
// ---------------------------------------------------------------------------

/// Whether a built index has anything in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexStatus {
    Populated,
    /// VPIS answered, but nothing is scheduled for the queried scope.
    NoActivitiesFound,
}

/// Rooms-by-time and courses-by-time views over the same slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OccupancyIndex {
    pub by_room: ByRoomIndex,
    pub by_course: ByCourseIndex,
}

impl OccupancyIndex {
    pub fn is_empty(&self) -> bool {
        self.by_room.is_empty()
    }

    pub fn status(&self) -> IndexStatus {
        if self.is_empty() {
            IndexStatus::NoActivitiesFound
        } else {
            IndexStatus::Populated
        }
    }

    /// Schedule of one room, keyed by local room key (`h409`).
    pub fn room(&self, room: &str) -> Option<&RoomSchedule> {
        self.by_room.get(room)
    }

    /// Schedule of one course, keyed by normalized course name.
    pub fn course(&self, course: &str) -> Option<&CourseSchedule> {
        self.by_course.get(course)
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.by_room
            .values()
            .flat_map(|dates| dates.values())
            .flat_map(|begins| begins.values())
            .map(BTreeMap::len)
            .sum()
    }

    /// All slots reachable through `by_room`, in room/date/begin order.
    pub fn room_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        for (room, dates) in &self.by_room {
            for (date, begins) in dates {
                for (begin, courses) in begins {
                    for (course, detail) in courses {
                        slots.push(slot(room, date, begin, course, detail));
                    }
                }
            }
        }
        slots
    }

    /// All slots reachable through `by_course`, in course/date/room/begin order.
    pub fn course_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        for (course, dates) in &self.by_course {
            for (date, rooms) in dates {
                for (room, begins) in rooms {
                    for (begin, detail) in begins {
                        slots.push(slot(room, date, begin, course, detail));
                    }
                }
            }
        }
        slots
    }

    /// Split into the two raw views.
    pub fn into_parts(self) -> (ByRoomIndex, ByCourseIndex) {
        (self.by_room, self.by_course)
    }
}

fn slot(room: &str, date: &str, begin: &str, course: &str, detail: &SlotDetail) -> Slot {
    Slot {
        room: room.to_string(),
        date: date.to_string(),
        begin: begin.to_string(),
        course: course.to_string(),
        kind: detail.kind.clone(),
        end: detail.end.clone(),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Folds [`ActivityRecord`]s into an [`OccupancyIndex`].
#[derive(Debug, Default)]
pub struct ActivityIndexBuilder {
    index: OccupancyIndex,
    skipped: usize,
}

impl ActivityIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every `room × date` slot of one record.
    ///
    /// Fails with `MalformedRoomIdentifier` before inserting anything if
    /// one of the record's rooms lacks its location prefix.
    pub fn add_record(&mut self, record: &ActivityRecord) -> Result<()> {
        let course = normalize_course_name(&record.name);
        let rooms = record
            .rooms
            .iter()
            .map(|r| room_key(r))
            .collect::<Result<Vec<_>>>()?;

        for room in &rooms {
            for date in &record.dates {
                self.insert(room, date, &course, &record.kind);
            }
        }
        Ok(())
    }

    /// Slots dropped because their `(room, date, begin)` was already taken.
    pub fn skipped_duplicates(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> OccupancyIndex {
        debug!(
            slots = self.index.slot_count(),
            skipped = self.skipped,
            "occupancy index built"
        );
        self.index
    }

    fn insert(&mut self, room: &str, date: &ActivityDate, course: &str, kind: &str) {
        let begins = self
            .index
            .by_room
            .entry(room.to_string())
            .or_default()
            .entry(date.date.clone())
            .or_default();

        if let Some(taken) = begins.get(&date.begin) {
            self.skipped += 1;
            if taken.contains_key(course) {
                debug!(room, date = %date.date, begin = %date.begin, course, "duplicate slot");
            } else {
                warn!(
                    room,
                    date = %date.date,
                    begin = %date.begin,
                    kept = ?taken.keys().collect::<Vec<_>>(),
                    dropped = course,
                    "two courses in one room at the same time, keeping the first"
                );
            }
            return;
        }

        let detail = SlotDetail {
            kind: kind.to_string(),
            end: date.end.clone(),
        };

        begins.insert(
            date.begin.clone(),
            BTreeMap::from([(course.to_string(), detail.clone())]),
        );

        self.index
            .by_course
            .entry(course.to_string())
            .or_default()
            .entry(date.date.clone())
            .or_default()
            .entry(room.to_string())
            .or_default()
            .insert(date.begin.clone(), detail);
    }
}
