//! Core data types for sample identity resolution.
//!
//! - [`RawInput`]: a file name or record header plus where it came from
//! - [`Observation`]: what the pattern library inferred from one input
//! - [`SampleGroup`]: all inputs resolved to one identity
//! - [`ValidationFinding`]: a non-fatal problem, reported as data
//! - [`MateRole`], [`Runtype`], [`Severity`]: classification enums
//!
//! [`RawInput`]: input::RawInput
//! [`Observation`]: observation::Observation
//! [`SampleGroup`]: group::SampleGroup
//! [`ValidationFinding`]: finding::ValidationFinding
//! [`MateRole`]: types::MateRole
//! [`Runtype`]: types::Runtype
//! [`Severity`]: types::Severity

pub mod finding;
pub mod group;
pub mod input;
pub mod observation;
pub mod types;
