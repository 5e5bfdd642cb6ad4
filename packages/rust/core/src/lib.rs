//! Query pipeline and vocabulary building for room-occupancy lookups.
//!
//! This crate ties together location resolution, the VPIS fetch chain and
//! indexing into end-to-end workflows:
//! - [`query::query_occupancy`]: location/semester/day → dual occupancy index
//! - [`catalog`]: room and course vocabularies per location
//! - [`vocabulary::Vocabulary`]: the startup initialization step

pub mod catalog;
pub mod query;
pub mod vocabulary;

#[cfg(test)]
mod testing;
