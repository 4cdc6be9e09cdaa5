//! The upcoming/urgent event pipeline.
//!
//! Every event-like kind (task, appointment, showing, open house) flows
//! through the same three stages:
//!
//! 1. `normalize` — one record into the common `DisplayEvent` shape,
//!    dropping records whose dates don't parse.
//! 2. `projections` — the named temporal policies (upcoming from now,
//!    due today, overdue) with their status exclusions.
//! 3. `rank` — merge all kinds, sort deterministically, cap after sorting.
//!
//! The pipeline is pure: same snapshot in, same ordered list out.

pub mod normalize;
pub mod projections;
pub mod rank;
