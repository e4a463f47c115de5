// Reading the tool's "jaded" result file back onto the original lines.
//
// Columns: input line id, output rank, score, penalty, gain, total score,
// root word, WGE, and then the selected sentence, which is ignored. The line
// id is 1-based into the normalized available corpus; since normalization
// keeps line positions, the same index finds the original line.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::error::{Result, SelectionError};

/// Number of leading fields every result line must carry.
pub const JADED_FIELDS: usize = 8;

/// One selected line as reported by the tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRecord {
    /// 1-based position in the normalized available corpus.
    pub input_line_id: usize,
    /// 1-based selection order.
    pub output_rank: usize,
    pub score: f64,
    pub penalty: f64,
    pub gain: f64,
    pub total_score: f64,
    pub root_word: String,
    /// Word-gain estimate, passed through uninterpreted.
    pub word_gain_estimate: String,
}

/// Original available line text -> selection record, in tool output order.
///
/// Known limitation: distinct available lines with identical text share a
/// key, so the later record replaces the earlier one (the key keeps its
/// first position). Deduplicate the available corpus upstream if every
/// occurrence needs its own record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMapping {
    entries: Vec<(String, SelectionRecord)>,
    index: HashMap<String, usize>,
}

/// Serializes as a map from line text to record, in tool output order.
impl Serialize for ResultMapping {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> std::result::Result<Z::Ok, Z::Error> {
        serializer.collect_map(self.iter())
    }
}

impl ResultMapping {
    fn insert(&mut self, line: String, record: SelectionRecord) {
        match self.index.get(&line) {
            Some(&pos) => self.entries[pos].1 = record,
            None => {
                self.index.insert(line.clone(), self.entries.len());
                self.entries.push((line, record));
            }
        }
    }

    pub fn get(&self, line: &str) -> Option<&SelectionRecord> {
        self.index.get(line).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order the tool reported them.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectionRecord)> {
        self.entries.iter().map(|(line, record)| (line.as_str(), record))
    }
}

/// Read a result file and key each record by its original available line.
///
/// The file is only read after the tool exited successfully, so a missing
/// file is the tool's fault and reported as malformed output at line 0.
pub fn read_jaded<S: AsRef<str>>(path: &Path, original_available: &[S]) -> Result<ResultMapping> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SelectionError::malformed(
            0,
            format!("tool exited successfully but wrote no {}", path.display()),
        ),
        _ => SelectionError::Io(e),
    })?;
    parse_jaded(BufReader::new(file), original_available)
}

/// Parse result lines from any reader. See [`read_jaded`].
pub fn parse_jaded<R: BufRead, S: AsRef<str>>(
    input: R,
    original_available: &[S],
) -> Result<ResultMapping> {
    let mut mapping = ResultMapping::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let record = parse_record(&line, line_no)?;

        let original = record
            .input_line_id
            .checked_sub(1)
            .and_then(|i| original_available.get(i))
            .ok_or_else(|| {
                SelectionError::malformed(
                    line_no,
                    format!(
                        "input line id {} outside available corpus of {} lines",
                        record.input_line_id,
                        original_available.len()
                    ),
                )
            })?;

        mapping.insert(original.as_ref().to_string(), record);
    }

    Ok(mapping)
}

fn parse_record(line: &str, line_no: usize) -> Result<SelectionRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < JADED_FIELDS {
        return Err(SelectionError::malformed(
            line_no,
            format!("expected {JADED_FIELDS} tab-separated fields, found {}", fields.len()),
        ));
    }

    Ok(SelectionRecord {
        input_line_id: parse_field(fields[0], "input line id", line_no)?,
        output_rank: parse_field(fields[1], "output rank", line_no)?,
        score: parse_field(fields[2], "score", line_no)?,
        penalty: parse_field(fields[3], "penalty", line_no)?,
        gain: parse_field(fields[4], "gain", line_no)?,
        total_score: parse_field(fields[5], "total score", line_no)?,
        root_word: fields[6].to_string(),
        word_gain_estimate: fields[7].to_string(),
    })
}

fn parse_field<T>(raw: &str, name: &str, line_no: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| SelectionError::malformed(line_no, format!("bad {name} {raw:?}: {e}")))
}
