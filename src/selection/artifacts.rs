// Files handed to the selection tool, all inside one working directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::corpus::equivalence::PreparedCorpora;
use crate::corpus::ratio::RatioTable;
use crate::corpus::vocab::write_vocabulary;
use crate::error::Result;

pub const AVAILABLE_CORPUS_FILE: &str = "avail.corpus";
pub const REPRESENTATIVE_VOCAB_FILE: &str = "repr.vocab";
pub const AVAILABLE_VOCAB_FILE: &str = "avail.vocab";
pub const SEED_VOCAB_FILE: &str = "seed.vocab";
pub const RATIOS_FILE: &str = "repr.avail.vocab.ratios";
pub const JADED_FILE: &str = "jaded.output";
pub const STDOUT_FILE: &str = "cynical.stdout";
pub const STDERR_FILE: &str = "cynical.stderr";

/// Paths of every artifact in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub working_dir: PathBuf,
    pub available_corpus: PathBuf,
    pub representative_vocab: PathBuf,
    pub available_vocab: PathBuf,
    pub seed_vocab: PathBuf,
    pub ratios: PathBuf,
    pub jaded: PathBuf,
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl ArtifactPaths {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            available_corpus: working_dir.join(AVAILABLE_CORPUS_FILE),
            representative_vocab: working_dir.join(REPRESENTATIVE_VOCAB_FILE),
            available_vocab: working_dir.join(AVAILABLE_VOCAB_FILE),
            seed_vocab: working_dir.join(SEED_VOCAB_FILE),
            ratios: working_dir.join(RATIOS_FILE),
            jaded: working_dir.join(JADED_FILE),
            stdout: working_dir.join(STDOUT_FILE),
            stderr: working_dir.join(STDERR_FILE),
        }
    }
}

/// Create the working directory and write the corpus, vocabulary, and
/// ratio files the tool reads.
pub fn write_artifacts(
    working_dir: &Path,
    prepared: &PreparedCorpora,
    ratios: &RatioTable,
) -> Result<ArtifactPaths> {
    fs::create_dir_all(working_dir)?;
    let paths = ArtifactPaths::new(working_dir);

    info!(path = %paths.available_corpus.display(), "Writing normalized available corpus");
    let mut corpus = BufWriter::new(File::create(&paths.available_corpus)?);
    for line in &prepared.available_lines {
        corpus.write_all(line.as_bytes())?;
        corpus.write_all(b"\n")?;
    }
    corpus.flush()?;

    write_vocabulary(
        BufWriter::new(File::create(&paths.representative_vocab)?),
        &prepared.representative_vocab,
    )?;
    write_vocabulary(
        BufWriter::new(File::create(&paths.available_vocab)?),
        &prepared.available_vocab,
    )?;
    write_vocabulary(
        BufWriter::new(File::create(&paths.seed_vocab)?),
        &prepared.seed_vocab,
    )?;

    info!(words = ratios.len(), "Writing vocabulary ratios");
    ratios.write_stats(BufWriter::new(File::create(&paths.ratios)?))?;

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::equivalence::{prepare_corpora, EquivalencePlan};

    #[test]
    fn test_writes_all_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("nested").join("work");
        let repr = ["a b", "b"];
        let avail = ["b c", "C  c"];
        let seed = ["a"];
        let plan = EquivalencePlan::detect(&repr, &avail, &seed);
        let prepared = prepare_corpora(plan, &repr, &avail, &seed, true);
        let ratios = RatioTable::compute(&prepared.representative_vocab, &prepared.available_vocab);

        let paths = write_artifacts(&work, &prepared, &ratios).unwrap();

        assert_eq!(fs::read_to_string(&paths.available_corpus).unwrap(), "b c\nc c\n");
        assert_eq!(fs::read_to_string(&paths.seed_vocab).unwrap(), "a\t1\t1\n");
        assert_eq!(
            fs::read_to_string(&paths.available_vocab).unwrap(),
            "c\t0.75\t3\nb\t0.25\t1\n"
        );
        assert_eq!(fs::read_to_string(&paths.ratios).unwrap().lines().count(), 3);
        assert!(!paths.jaded.exists());
    }
}
