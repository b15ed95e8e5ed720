//! Snapshot loading and expression evaluation shared by `list` and `graph`

use crate::cli::commands::QueryArgs;
use crate::config::CliConfig;
use anyhow::{anyhow, bail, Context, Result};
use pkgsel_core::query::{self, Catalog, EvalOptions};
use pkgsel_core::{load_snapshot, PackageSet, ReferenceSet, Snapshot, SnapshotError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Snapshot locations given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotFlags<'a> {
    /// `--snapshot`
    pub snapshot: Option<&'a Path>,
    /// `--reference`
    pub reference: Option<&'a Path>,
}

/// Where to load from and how to evaluate, after flags override
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Expression text, arguments joined with single spaces
    pub source: String,
    /// Main snapshot
    pub snapshot: PathBuf,
    /// Reference snapshot to subtract, unless `--with-reference`
    pub reference: Option<PathBuf>,
    /// Evaluation options
    pub options: EvalOptions,
}

impl QueryPlan {
    /// Merge command-line flags over configuration.
    ///
    /// # Errors
    /// Fails when no snapshot is given by flag or configuration.
    pub fn resolve(
        args: &QueryArgs,
        flags: SnapshotFlags<'_>,
        config: &CliConfig,
    ) -> Result<Self> {
        let snapshot = flags
            .snapshot
            .map(Path::to_path_buf)
            .or_else(|| non_empty_path(&config.snapshot.path))
            .ok_or_else(|| {
                anyhow!(
                    "no package snapshot given\n  Suggestion: pass --snapshot FILE or run 'pkgsel config set snapshot.path FILE'"
                )
            })?;

        let reference = if args.with_reference {
            None
        } else {
            flags
                .reference
                .map(Path::to_path_buf)
                .or_else(|| non_empty_path(&config.snapshot.reference_path))
        };

        let options = if args.lenient || config.evaluation.lenient_packages {
            EvalOptions::lenient()
        } else {
            EvalOptions::strict()
        };

        Ok(Self {
            source: args.expr.join(" "),
            snapshot,
            reference,
            options,
        })
    }
}

fn non_empty_path(path: &str) -> Option<PathBuf> {
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Loaded snapshots for one invocation.
pub struct Loaded {
    /// Universe the expression is evaluated against
    pub universe: Snapshot,
    /// Paths to drop from the result
    pub reference: Option<ReferenceSet>,
}

/// Load the main and reference snapshots concurrently.
///
/// Ctrl-C while loading aborts the command.
///
/// # Errors
/// Fails when either snapshot cannot be loaded or loading is interrupted.
pub async fn load(plan: &QueryPlan) -> Result<Loaded> {
    tokio::select! {
        loaded = load_snapshots(plan) => {
            let loaded = loaded.context("failed to load package snapshot")?;
            info!(
                packages = loaded.universe.package_count(),
                path = %plan.snapshot.display(),
                "loaded snapshot"
            );
            Ok(loaded)
        }
        _ = tokio::signal::ctrl_c() => bail!("interrupted while loading snapshots"),
    }
}

async fn load_snapshots(plan: &QueryPlan) -> Result<Loaded, SnapshotError> {
    let main = load_snapshot(&plan.snapshot);
    let Some(path) = &plan.reference else {
        return Ok(Loaded {
            universe: main.await?,
            reference: None,
        });
    };

    let (universe, reference) = tokio::try_join!(main, load_snapshot(path))?;
    info!(
        packages = reference.package_count(),
        path = %path.display(),
        "loaded reference snapshot"
    );
    Ok(Loaded {
        universe,
        reference: Some(ReferenceSet::from_universe(&reference)),
    })
}

/// Evaluate the plan's expression and drop reference packages.
///
/// # Errors
/// Fails with the rendered query error, including a caret under the
/// offending column for syntax errors.
pub fn select(plan: &QueryPlan, loaded: &Loaded) -> Result<PackageSet> {
    let catalog = Catalog::standard();
    let set = query::evaluate(&plan.source, &catalog, &loaded.universe, plan.options)
        .map_err(|err| anyhow!(err.render(&plan.source)))?;

    Ok(match &loaded.reference {
        Some(reference) => {
            let kept = reference.subtract(&set, &loaded.universe);
            info!(
                selected = set.len(),
                kept = kept.len(),
                "subtracted reference packages"
            );
            kept
        }
        None => set,
    })
}
