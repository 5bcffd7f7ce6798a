//! Naming rules and the resolution engine.
//!
//! - [`PatternLibrary`]: ordered set of naming rules plus an optional custom pattern
//! - [`CandidateScanner`]: classifies raw inputs into observations
//! - [`ResolutionEngine`]: runs scanning, grouping, validation and reporting
//!
//! ## Rule Order
//!
//! Rules are tried in priority order and the first match wins. A custom pattern,
//! when set, is always tried first. FASTQ rules capture both an identity and a
//! mate role; isolate rules capture only an identity.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sample_resolver::{RawInput, ResolutionEngine};
//!
//! let engine = ResolutionEngine::new().unwrap();
//! let inputs = vec![
//!     RawInput::from_path("S1_R1_001.fastq.gz"),
//!     RawInput::from_path("S1_R2_001.fastq.gz"),
//! ];
//! let report = engine.resolve_reads(&inputs, None);
//!
//! for row in &report.rows {
//!     println!("{}\t{}", row.sample, row.runtype);
//! }
//! ```

pub mod engine;
pub mod library;
pub mod rule;
pub mod scanner;

pub use engine::{EngineConfig, ResolutionEngine};
pub use library::PatternLibrary;
pub use scanner::CandidateScanner;
