// Vocabulary counting: unigram counts and probabilities for one corpus.
//
// The table is sorted by descending count with ties broken by ascending
// word. Written vocabulary files are compared byte for byte downstream, so
// the order must never depend on map iteration.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{BufRead, Write};

use super::normalize::is_separator;
use crate::error::{Result, SelectionError};

/// One word's statistics within a single corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct WordStat {
    pub word: String,
    /// `count / total token count of the corpus`
    pub probability: f64,
    pub count: u64,
}

impl WordStat {
    pub fn new(word: impl Into<String>, probability: f64, count: u64) -> Self {
        Self {
            word: word.into(),
            probability,
            count,
        }
    }
}

/// Count separator-delimited tokens across all lines.
///
/// Probabilities are relative to total token occurrences, not to the
/// number of distinct words. An empty corpus produces an empty table.
pub fn count_vocabulary<I>(lines: I) -> Vec<WordStat>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for line in lines {
        for word in line.as_ref().split(is_separator).filter(|w| !w.is_empty()) {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    let vocab_size: u64 = counts.values().sum();

    let mut table: Vec<WordStat> = counts
        .into_iter()
        .map(|(word, count)| {
            let probability = if vocab_size == 0 {
                0.0
            } else {
                count as f64 / vocab_size as f64
            };
            WordStat {
                word,
                probability,
                count,
            }
        })
        .collect();

    table.sort_by(compare_by_frequency);
    table
}

/// Descending count, then ascending word.
pub fn compare_by_frequency(a: &WordStat, b: &WordStat) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word))
}

/// Total token occurrences represented by a table.
pub fn vocab_size(table: &[WordStat]) -> u64 {
    table.iter().map(|stat| stat.count).sum()
}

/// Write a table as `word\tprobability\tcount` lines, in table order.
pub fn write_vocabulary<W: Write>(mut out: W, table: &[WordStat]) -> std::io::Result<()> {
    for stat in table {
        writeln!(out, "{}\t{}\t{}", stat.word, stat.probability, stat.count)?;
    }
    out.flush()
}

/// Read a vocabulary file back into a table, preserving line order.
pub fn read_vocabulary<R: BufRead>(input: R) -> Result<Vec<WordStat>> {
    let mut table = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut fields = line.split('\t');
        let (Some(word), Some(probability), Some(count)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(SelectionError::malformed(
                line_no,
                "vocabulary line needs word, probability and count",
            ));
        };
        let probability = probability.parse::<f64>().map_err(|e| {
            SelectionError::malformed(line_no, format!("bad probability {probability:?}: {e}"))
        })?;
        let count = count.parse::<u64>().map_err(|e| {
            SelectionError::malformed(line_no, format!("bad count {count:?}: {e}"))
        })?;
        table.push(WordStat::new(word, probability, count));
    }
    Ok(table)
}
