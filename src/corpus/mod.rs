// Corpus preparation: normalization, vocabulary counts, ratios, and input
// equivalence detection.

pub mod equivalence;
pub mod normalize;
pub mod ratio;
pub mod vocab;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SelectionError};
use vocab::WordStat;

/// Read a corpus file into memory, one entry per line without terminators.
pub fn read_corpus(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| SelectionError::input(path, e))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| SelectionError::input(path, e))
}

/// Read a `word\tprobability\tcount` vocabulary file.
pub fn read_vocabulary_file(path: &Path) -> Result<Vec<WordStat>> {
    let file = File::open(path).map_err(|e| SelectionError::input(path, e))?;
    vocab::read_vocabulary(BufReader::new(file))
}
