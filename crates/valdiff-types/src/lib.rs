//! Foundation types for the valdiff structural difference engine.
//!
//! This crate provides the dynamic value model and the difference-reporting
//! types used throughout valdiff. Every other valdiff crate depends on
//! `valdiff-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Closed dynamic model every comparable input is classified into
//! - [`Reflect`] — Compile-time seam converting concrete Rust values into [`Value`]
//! - [`DifferenceRecord`] / [`DiffKind`] — One reported discrepancy
//! - [`AggregatedDifference`] — Per-call accumulator and message renderer
//! - [`Criteria`] — Member-selection configuration for the graph walker

pub mod aggregate;
pub mod criteria;
pub mod error;
pub mod record;
pub mod reflect;
pub mod value;

pub use aggregate::{AggregatedDifference, DiffNode, MAX_DETAIL_LINES};
pub use criteria::{Criteria, VisibilityScope};
pub use error::TypeError;
pub use record::{DiffKind, DifferenceRecord};
pub use reflect::Reflect;
pub use value::{
    FloatValue, IntValue, Member, MemberKind, Numeric, RecordValue, Value, Visibility,
};
