//! Startup vocabulary: every room number and course name, ready to be
//! written as speech-recognition entity files.

use std::path::{Path, PathBuf};

use occupancy_shared::{Location, OccupancyError, Result, aliases_for};
use occupancy_vpis::{CatalogFetcher, HttpTransport};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::catalog::{CourseCatalog, RoomCatalog, build_course_catalog, build_room_catalog};

pub const ROOM_ENTITY_FILE: &str = "room.entity";
pub const COURSE_ENTITY_FILE: &str = "course.entity";
pub const LOCATION_ENTITY_FILE: &str = "location.entity";

/// Progress callback for vocabulary initialization.
pub trait CatalogProgress: Send + Sync {
    /// Called when a catalog build starts.
    fn phase(&self, name: &str);
    /// Called when a catalog build finished with `entries` values.
    fn finished(&self, name: &str, entries: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl CatalogProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn finished(&self, _name: &str, _entries: usize) {}
}

/// Room and course catalogs held for the lifetime of the process.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Vocabulary {
    pub rooms: RoomCatalog,
    pub courses: CourseCatalog,
}

impl Vocabulary {
    /// Build both catalogs. Course listings are taken from both terms of `year`.
    #[instrument(skip_all, fields(year = year))]
    pub async fn initialize<T: HttpTransport>(
        fetcher: &CatalogFetcher<T>,
        year: u16,
        progress: &dyn CatalogProgress,
    ) -> Result<Self> {
        progress.phase("rooms");
        let rooms = build_room_catalog(fetcher).await?;
        let room_count = rooms.values().map(Vec::len).sum();
        progress.finished("rooms", room_count);

        progress.phase("courses");
        let courses = build_course_catalog(fetcher, year).await?;
        let course_count = courses.values().map(Vec::len).sum();
        progress.finished("courses", course_count);

        info!(rooms = room_count, courses = course_count, "vocabulary initialized");
        Ok(Self { rooms, courses })
    }

    /// Room entity lines, location by location.
    pub fn room_entries(&self) -> Vec<String> {
        flatten(self.rooms.values())
    }

    /// Course entity lines, location by location.
    pub fn course_entries(&self) -> Vec<String> {
        flatten(self.courses.values())
    }

    /// Locations with an empty room list.
    pub fn locations_without_rooms(&self) -> Vec<Location> {
        self.rooms
            .iter()
            .filter(|(_, rooms)| rooms.is_empty())
            .map(|(location, _)| *location)
            .collect()
    }

    /// Write `room.entity`, `course.entity` and `location.entity` into every
    /// subdirectory of `locale_root`. Returns the written paths.
    ///
    /// An empty catalog leaves its entity file untouched.
    #[instrument(skip_all, fields(locale_root = %locale_root.display()))]
    pub fn write_entity_files(&self, locale_root: &Path) -> Result<Vec<PathBuf>> {
        let rooms = self.room_entries();
        let courses = self.course_entries();
        let locations = location_entries();
        if rooms.is_empty() {
            warn!("no room entities, room.entity not written");
        }
        if courses.is_empty() {
            warn!("no course entities, course.entity not written");
        }

        let mut written = Vec::new();
        for locale in locale_dirs(locale_root)? {
            let files = [
                (ROOM_ENTITY_FILE, &rooms),
                (COURSE_ENTITY_FILE, &courses),
                (LOCATION_ENTITY_FILE, &locations),
            ];
            for (file, entries) in files {
                if entries.is_empty() {
                    continue;
                }
                let path = locale.join(file);
                std::fs::write(&path, entity_text(entries))
                    .map_err(|e| OccupancyError::io(&path, e))?;
                written.push(path);
            }
        }

        info!(files = written.len(), "entity files written");
        Ok(written)
    }
}

/// Alias lines for the location entity, canonical names first.
pub fn location_entries() -> Vec<String> {
    Location::ALL
        .into_iter()
        .flat_map(|location| {
            std::iter::once(location.name().to_lowercase())
                .chain(aliases_for(location).into_iter().map(str::to_string))
        })
        .fold(Vec::new(), |mut acc, alias| {
            if !acc.contains(&alias) {
                acc.push(alias);
            }
            acc
        })
}

fn flatten<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
    lists.flatten().map(|entry| entry.to_lowercase()).collect()
}

fn entity_text(entries: &[String]) -> String {
    let mut text = entries.join("\n");
    text.push('\n');
    text
}

fn locale_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(|e| OccupancyError::io(root, e))? {
        let entry = entry.map_err(|e| OccupancyError::io(root, e))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
