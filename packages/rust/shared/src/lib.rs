//! Shared types, error model, and configuration for the room-occupancy workspace.
//!
//! This crate is the foundation depended on by all other occupancy crates.
//! It provides:
//! - [`OccupancyError`]: the unified error type
//! - Domain types ([`Location`], [`Term`], [`ActivityRecord`], [`Slot`])
//! - Location alias resolution ([`resolve_location`])
//! - Configuration ([`AppConfig`], [`VpisConfig`], config loading)

pub mod config;
pub mod error;
pub mod location;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, VpisConfig, VpisSection, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{OccupancyError, Result};
pub use location::{Location, aliases_for, resolve_location};
pub use types::{ActivityDate, ActivityRecord, Season, Slot, SlotDetail, Term};
