// Vocabulary ratios between a representative (corpus1) and an available
// (corpus2) unigram model.
//
// ratio = prob1 / prob2 is "how many times more likely the word is in the
// representative corpus". A word missing from one side has its count there
// smoothed to 0.5, so it scores twice as extreme as a singleton would. The
// arithmetic is reproduced as-is; it is not a probabilistic derivation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Write;

use super::vocab::WordStat;

/// Probability and count of a word within one corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpusStat {
    pub probability: f64,
    pub count: u64,
}

impl From<&WordStat> for CorpusStat {
    fn from(stat: &WordStat) -> Self {
        Self {
            probability: stat.probability,
            count: stat.count,
        }
    }
}

/// Which corpora a word was seen in. There is no "neither" case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sides {
    Corpus1 { corpus1: CorpusStat },
    Corpus2 { corpus2: CorpusStat },
    Both { corpus1: CorpusStat, corpus2: CorpusStat },
}

/// Merged two-corpus record for one word, ratio computed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordProbabilityInfo {
    sides: Sides,
    ratio: f64,
}

impl WordProbabilityInfo {
    /// Seen only in corpus1: ratio = 2 * count1.
    pub fn from_corpus1(corpus1: CorpusStat) -> Self {
        Self {
            sides: Sides::Corpus1 { corpus1 },
            ratio: 2.0 * corpus1.count as f64,
        }
    }

    /// Seen only in corpus2: ratio = 1 / (2 * count2).
    pub fn from_corpus2(corpus2: CorpusStat) -> Self {
        Self {
            sides: Sides::Corpus2 { corpus2 },
            ratio: 1.0 / (2.0 * corpus2.count as f64),
        }
    }

    /// Seen in both: ratio = prob1 / prob2.
    pub fn from_both(corpus1: CorpusStat, corpus2: CorpusStat) -> Self {
        Self {
            sides: Sides::Both { corpus1, corpus2 },
            ratio: corpus1.probability / corpus2.probability,
        }
    }

    pub fn sides(&self) -> Sides {
        self.sides
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn corpus1(&self) -> Option<CorpusStat> {
        match self.sides {
            Sides::Corpus1 { corpus1 } | Sides::Both { corpus1, .. } => Some(corpus1),
            Sides::Corpus2 { .. } => None,
        }
    }

    pub fn corpus2(&self) -> Option<CorpusStat> {
        match self.sides {
            Sides::Corpus2 { corpus2 } | Sides::Both { corpus2, .. } => Some(corpus2),
            Sides::Corpus1 { .. } => None,
        }
    }

    fn corpus1_probability(&self) -> f64 {
        self.corpus1().map_or(0.0, |s| s.probability)
    }

    fn corpus2_probability(&self) -> f64 {
        self.corpus2().map_or(0.0, |s| s.probability)
    }
}

/// Word -> merged record for two vocabularies.
#[derive(Debug, Clone, Default)]
pub struct RatioTable {
    entries: HashMap<String, WordProbabilityInfo>,
}

impl RatioTable {
    /// Merge corpus1 (representative) and corpus2 (available) tables.
    pub fn compute(corpus1: &[WordStat], corpus2: &[WordStat]) -> Self {
        let mut entries: HashMap<String, WordProbabilityInfo> =
            HashMap::with_capacity(corpus1.len().max(corpus2.len()));

        for stat in corpus1 {
            entries.insert(
                stat.word.clone(),
                WordProbabilityInfo::from_corpus1(stat.into()),
            );
        }

        for stat in corpus2 {
            let merged = match entries.get(&stat.word).and_then(|info| info.corpus1()) {
                Some(corpus1) => WordProbabilityInfo::from_both(corpus1, stat.into()),
                None => WordProbabilityInfo::from_corpus2(stat.into()),
            };
            entries.insert(stat.word.clone(), merged);
        }

        Self { entries }
    }

    pub fn get(&self, word: &str) -> Option<&WordProbabilityInfo> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in persisted order: descending ratio, descending corpus1
    /// probability, descending corpus2 probability, ascending word.
    /// Absent probabilities sort as 0.
    pub fn sorted(&self) -> Vec<(&str, &WordProbabilityInfo)> {
        let mut rows: Vec<(&str, &WordProbabilityInfo)> = self
            .entries
            .iter()
            .map(|(word, info)| (word.as_str(), info))
            .collect();
        rows.sort_by(|a, b| compare_rows(*a, *b));
        rows
    }

    /// Write `word\tratio\tprob1\tcount1\tprob2\tcount2` lines in sorted
    /// order, absent sides written as 0.
    pub fn write_stats<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (word, info) in self.sorted() {
            let corpus1 = info.corpus1();
            let corpus2 = info.corpus2();
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}",
                word,
                info.ratio(),
                corpus1.map_or(0.0, |s| s.probability),
                corpus1.map_or(0, |s| s.count),
                corpus2.map_or(0.0, |s| s.probability),
                corpus2.map_or(0, |s| s.count),
            )?;
        }
        out.flush()
    }
}

fn compare_rows(a: (&str, &WordProbabilityInfo), b: (&str, &WordProbabilityInfo)) -> Ordering {
    let (word_a, info_a) = a;
    let (word_b, info_b) = b;
    info_b
        .ratio()
        .total_cmp(&info_a.ratio())
        .then_with(|| info_b.corpus1_probability().total_cmp(&info_a.corpus1_probability()))
        .then_with(|| info_b.corpus2_probability().total_cmp(&info_a.corpus2_probability()))
        .then_with(|| word_a.cmp(word_b))
}
