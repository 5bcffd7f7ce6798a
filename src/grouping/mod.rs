//! Aggregation of observations into sample groups.
//!
//! - [`GroupResolver`]: groups observations by identity and resolves mate pairs
//! - [`LengthFilter`]: excludes records by length before grouping
//!
//! ## Resolution rules
//!
//! | Members | Runtype | Finding |
//! |---------|---------|---------|
//! | R1 + R2 | `Paired` | none |
//! | R1 or R2 only | `IncompletePair` | `IncompletePair` |
//! | unpaired only | `Single` | `AmbiguousIdentity` if more than one |
//! | second R1 (or R2) | first one kept | `ConflictingMate` |
//!
//! [`GroupResolver`]: resolver::GroupResolver
//! [`LengthFilter`]: filter::LengthFilter

pub mod filter;
pub mod resolver;
