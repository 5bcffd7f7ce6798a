use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::rename::scheme::RenameScheme;
use crate::utils::validation::FileSizeProbe;

/// Directory created beside renamed files to hold copies of the originals
pub const BACKUP_DIR_NAME: &str = "backup_originals";

#[derive(Error, Debug)]
pub enum RenameError {
    #[error("{0} rename conflict(s); use --force to proceed anyway")]
    Conflicts(usize),

    #[error("Failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One planned move within a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameMove {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RenameConflict {
    /// Several sources would be renamed to the same target
    DuplicateTarget { target: PathBuf, sources: Vec<PathBuf> },

    /// The target already exists and is not the source itself
    ExistingTarget { source: PathBuf, target: PathBuf },
}

impl std::fmt::Display for RenameConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameConflict::DuplicateTarget { target, sources } => {
                let names: Vec<String> = sources.iter().map(|p| file_name(p)).collect();
                write!(f, "{} would be produced by {}", file_name(target), names.join(", "))
            }
            RenameConflict::ExistingTarget { source, target } => {
                write!(f, "{} already exists (renaming {})", file_name(target), file_name(source))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenamePlan {
    /// Moves in input order; names that would not change are left out
    pub moves: Vec<RenameMove>,
    pub conflicts: Vec<RenameConflict>,
}

impl RenamePlan {
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// How a plan is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Log the moves without performing them
    pub dry_run: bool,
    /// Proceed despite conflicts
    pub force: bool,
    /// Copy every source into [`BACKUP_DIR_NAME`] before the first move
    pub backup: bool,
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameOutcome {
    pub dry_run: bool,
    /// Copies made before renaming
    pub backups: Vec<PathBuf>,
    pub renamed: Vec<RenameMove>,
    /// Later moves onto a target already claimed by an earlier move
    pub skipped: Vec<RenameMove>,
    pub failed: Vec<(RenameMove, String)>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Compute new names for `paths` and detect conflicts.
///
/// Each file keeps its directory. `probe` reports whether a target already exists.
pub fn plan_renames(
    paths: &[PathBuf],
    scheme: RenameScheme,
    suffix: &str,
    probe: &dyn FileSizeProbe,
) -> RenamePlan {
    let mut plan = RenamePlan::default();
    let mut by_target: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
    let mut target_order: Vec<PathBuf> = Vec::new();

    for path in paths {
        let name = file_name(path);
        let new_name = scheme.rename(&name, suffix);
        if new_name == name {
            debug!("Unchanged: {name}");
            continue;
        }

        let target = path.with_file_name(&new_name);
        if probe.probe(&target).exists && target != *path {
            plan.conflicts.push(RenameConflict::ExistingTarget {
                source: path.clone(),
                target: target.clone(),
            });
        }

        let sources = by_target.entry(target.clone()).or_default();
        if sources.is_empty() {
            target_order.push(target.clone());
        }
        sources.push(path.clone());

        plan.moves.push(RenameMove {
            from: path.clone(),
            to: target,
        });
    }

    for target in target_order {
        if let Some(sources) = by_target.remove(&target) {
            if sources.len() > 1 {
                plan.conflicts
                    .push(RenameConflict::DuplicateTarget { target, sources });
            }
        }
    }

    plan
}

/// Copy the source of every move into a [`BACKUP_DIR_NAME`] directory beside it.
///
/// # Errors
///
/// Returns `RenameError::Backup` on the first file that cannot be copied.
pub fn backup_sources(plan: &RenamePlan) -> Result<Vec<PathBuf>, RenameError> {
    let mut backups = Vec::with_capacity(plan.moves.len());
    for mv in &plan.moves {
        let dir = mv
            .from
            .parent()
            .map_or_else(|| PathBuf::from(BACKUP_DIR_NAME), |p| p.join(BACKUP_DIR_NAME));
        let target = dir.join(file_name(&mv.from));
        std::fs::create_dir_all(&dir)
            .and_then(|()| std::fs::copy(&mv.from, &target))
            .map_err(|source| RenameError::Backup {
                path: mv.from.clone(),
                source,
            })?;
        debug!("Backed up {} to {}", file_name(&mv.from), dir.display());
        backups.push(target);
    }
    if !backups.is_empty() {
        info!("Backed up {} files", backups.len());
    }
    Ok(backups)
}

/// Perform the moves of `plan`.
///
/// Conflicts block the whole plan unless `force` is set or this is a dry run.
/// When forced, only the first move onto a duplicated target is performed and an
/// existing target is overwritten. With `backup`, nothing is moved unless every
/// source was copied first.
///
/// # Errors
///
/// Returns `RenameError::Conflicts` when the plan has conflicts and neither
/// `force` nor `dry_run` is set, and `RenameError::Backup` when a backup copy
/// fails. Failures of individual moves are collected in the outcome.
pub fn apply(plan: &RenamePlan, options: ApplyOptions) -> Result<RenameOutcome, RenameError> {
    let ApplyOptions {
        dry_run,
        force,
        backup,
    } = options;
    if plan.has_conflicts() {
        for conflict in &plan.conflicts {
            warn!("Conflict: {conflict}");
        }
        if !force && !dry_run {
            return Err(RenameError::Conflicts(plan.conflicts.len()));
        }
    }

    let mut outcome = RenameOutcome {
        dry_run,
        ..RenameOutcome::default()
    };
    if backup && !dry_run {
        outcome.backups = backup_sources(plan)?;
    }
    let mut claimed: Vec<&Path> = Vec::new();

    for mv in &plan.moves {
        if claimed.contains(&mv.to.as_path()) {
            warn!("Skipping {}: target already claimed", file_name(&mv.from));
            outcome.skipped.push(mv.clone());
            continue;
        }
        claimed.push(&mv.to);

        if dry_run {
            info!("[dry run] {} -> {}", file_name(&mv.from), file_name(&mv.to));
            outcome.renamed.push(mv.clone());
            continue;
        }

        match std::fs::rename(&mv.from, &mv.to) {
            Ok(()) => {
                info!("Renamed {} -> {}", file_name(&mv.from), file_name(&mv.to));
                outcome.renamed.push(mv.clone());
            }
            Err(e) => {
                warn!("Failed to rename {}: {e}", mv.from.display());
                outcome.failed.push((mv.clone(), e.to_string()));
            }
        }
    }

    Ok(outcome)
}
