//! Test fixtures for dataset-backed tests.
//!
//! Fixtures are SQL scripts loaded at compile time with `include_str!` and
//! turned into database images by `test_utils::image_from_sql`.

/// Play-by-play dataset.
///
/// Contains:
/// - `plays`: 6 rows over SHOTGUN, UNDER CENTER and PISTOL formations,
///   3 of them sacks (2 SHOTGUN, 1 UNDER CENTER); play 6 has a NULL description
/// - `teams`: 2 rows
///
/// Both tables are declared one column per line so their columns parse.
pub const PLAYS: &str = include_str!("plays.sql");
