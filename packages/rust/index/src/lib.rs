//! Occupancy indexing: VPIS activity XML → rooms-by-time and courses-by-time.
//!
//! This crate provides:
//! - [`parse_activities`]: activity XML into [`ActivityRecord`](occupancy_shared::ActivityRecord)s
//! - [`ActivityIndexBuilder`]: folds records into an [`OccupancyIndex`]
//! - [`build_index`]: both steps in one call

mod builder;
mod records;

pub use builder::{
    ActivityIndexBuilder, ByCourseIndex, ByRoomIndex, CourseSchedule, IndexStatus,
    OccupancyIndex, RoomSchedule,
};
pub use records::parse_activities;

use occupancy_shared::Result;

/// Parse a raw activities document and build both indices from it.
///
/// An empty document yields an empty index (status
/// [`IndexStatus::NoActivitiesFound`]), not an error.
pub fn build_index(raw_xml: &str) -> Result<OccupancyIndex> {
    let records = parse_activities(raw_xml)?;
    let mut builder = ActivityIndexBuilder::new();
    for record in &records {
        builder.add_record(record)?;
    }
    Ok(builder.finish())
}
