//! Guillotine cutting plans for rectangular stock sheets.
//!
//! A cut list is expanded into unit pieces, ordered by area, width and
//! height, and each ordering is packed sheet by sheet with a best short-side
//! fit over a set of free rectangles. The ordering with the highest overall
//! material efficiency wins.

pub mod allocator;
pub mod api;
pub mod config;
pub mod error;
pub mod free_rects;
pub mod render;
pub mod sheet;
pub mod solver;
pub mod summary;
pub mod types;

pub use error::{PlanError, Result};
pub use solver::{Solver, compute_plan};
