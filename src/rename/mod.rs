//! Normalization of sequence file names.
//!
//! File names are split on `_` and rebuilt from selected fields, keeping the
//! original extension:
//!
//! | Scheme | `HSP1_001_S5_L001.fastq.gz` |
//! |--------|------------------------------|
//! | `first-last` | `HSP1_L001.fastq.gz` |
//! | `first-only` | `HSP1.fastq.gz` |
//! | `first-two` | `HSP1_001.fastq.gz` |
//!
//! Planning is separate from applying, so a plan can be inspected (or printed as
//! a dry run) before any file is moved. Originals can be copied into a
//! `backup_originals/` directory first.

pub mod plan;
pub mod scheme;

pub use plan::{
    apply, backup_sources, plan_renames, ApplyOptions, RenameConflict, RenameError, RenameMove,
    RenameOutcome, RenamePlan, BACKUP_DIR_NAME,
};
pub use scheme::RenameScheme;
