// End-to-end selection run.
//
// One call processes one (representative, available, seed) triple to
// completion: plan reuse, normalize and count, compute ratios, write
// artifacts, run the tool, and map its results back onto the caller's
// original available lines. Nothing is shared between calls except the
// working directory on disk.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::config::SelectionConfig;
use crate::corpus::equivalence::{prepare_corpora, EquivalencePlan};
use crate::corpus::ratio::RatioTable;
use crate::error::Result;
use crate::selection::artifacts::write_artifacts;
use crate::selection::invoke::{build_args, resolve_tool, run_tool};
use crate::selection::jaded::{read_jaded, ResultMapping};

/// Run cynical selection over buffered corpora.
///
/// Corpora are taken as slices so input equivalence can be checked without
/// exhausting anything. The working directory is removed after a successful
/// run unless `save_output` is set, and is always kept after a failure so
/// the tool's captured output can be inspected.
pub fn run_selection<S: AsRef<str>>(
    representative: &[S],
    available: &[S],
    seed: &[S],
    config: &SelectionConfig,
) -> Result<ResultMapping> {
    let tool = resolve_tool(&config.tool)?;

    let plan = EquivalencePlan::detect(representative, available, seed);
    let prepared = prepare_corpora(plan, representative, available, seed, config.lower);

    info!(
        repr_words = prepared.representative_vocab.len(),
        avail_words = prepared.available_vocab.len(),
        seed_words = prepared.seed_vocab.len(),
        "Vocabulary counts ready"
    );

    let ratios = RatioTable::compute(&prepared.representative_vocab, &prepared.available_vocab);
    let paths = write_artifacts(&config.outdir, &prepared, &ratios)?;

    // Everything the tool reads is on disk; free the tables before it runs.
    drop(ratios);
    drop(prepared);

    let args = build_args(config, &paths);
    run_tool(&tool, &args, &paths)?;

    let mapping = read_jaded(&paths.jaded, available)?;
    info!(selected = mapping.len(), "Selection results reconciled");

    if config.save_output {
        info!(path = %paths.jaded.display(), "Selection output kept");
    } else {
        remove_working_dir(&config.outdir);
    }

    Ok(mapping)
}

/// Best-effort removal; failures are logged and otherwise ignored.
fn remove_working_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!(path = %dir.display(), error = %e, "Could not remove working directory");
    }
}
