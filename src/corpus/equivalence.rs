// Reuse of normalized/counted corpora when raw inputs are identical.
//
// The plan is decided once, from the raw lines, before any normalization
// runs. Exploiting it must not change any artifact: a reused table is the
// same table the corpus would have produced on its own.

use tracing::{debug, info};

use super::normalize::normalize_lines;
use super::vocab::{count_vocabulary, WordStat};

/// Where a corpus's vocabulary table comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusSource {
    /// Normalize and count this corpus itself.
    Distinct,
    /// Identical to the representative corpus.
    Representative,
    /// Identical to the available corpus.
    Available,
}

/// Decision table for the representative and seed corpora. The available
/// corpus is always processed, since its normalized lines are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquivalencePlan {
    /// `Distinct` or `Available`.
    pub representative: CorpusSource,
    /// `Distinct`, `Representative`, or `Available`.
    pub seed: CorpusSource,
}

impl EquivalencePlan {
    /// Compare raw corpora as whole sequences (same lines, same order).
    pub fn detect<S: AsRef<str>>(representative: &[S], available: &[S], seed: &[S]) -> Self {
        let avail_is_repr = same_lines(available, representative);
        let seed_is_repr = same_lines(seed, representative);
        let seed_is_avail = same_lines(seed, available);

        let plan = Self {
            representative: if avail_is_repr {
                CorpusSource::Available
            } else {
                CorpusSource::Distinct
            },
            seed: if seed_is_repr {
                CorpusSource::Representative
            } else if seed_is_avail {
                CorpusSource::Available
            } else {
                CorpusSource::Distinct
            },
        };
        debug!(?plan, "Input equivalence plan");
        plan
    }

    /// Plan that never reuses anything.
    pub fn all_distinct() -> Self {
        Self {
            representative: CorpusSource::Distinct,
            seed: CorpusSource::Distinct,
        }
    }
}

fn same_lines<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.as_ref() == y.as_ref())
}

/// Normalized available lines plus the three vocabulary tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCorpora {
    pub available_lines: Vec<String>,
    pub representative_vocab: Vec<WordStat>,
    pub available_vocab: Vec<WordStat>,
    pub seed_vocab: Vec<WordStat>,
}

/// Normalize and count the three corpora according to `plan`.
pub fn prepare_corpora<S: AsRef<str>>(
    plan: EquivalencePlan,
    representative: &[S],
    available: &[S],
    seed: &[S],
    lower: bool,
) -> PreparedCorpora {
    info!(lines = available.len(), "Normalizing available corpus");
    let available_lines: Vec<String> = normalize_lines(available, lower).collect();
    let available_vocab = count_vocabulary(&available_lines);

    let representative_vocab = match plan.representative {
        CorpusSource::Distinct => {
            info!(lines = representative.len(), "Normalizing representative corpus");
            count_vocabulary(normalize_lines(representative, lower))
        }
        _ => {
            info!("Representative corpus matches available corpus, reusing counts");
            available_vocab.clone()
        }
    };

    let seed_vocab = match plan.seed {
        CorpusSource::Representative => {
            info!("Seed corpus matches representative corpus, reusing counts");
            representative_vocab.clone()
        }
        CorpusSource::Available => {
            info!("Seed corpus matches available corpus, reusing counts");
            available_vocab.clone()
        }
        CorpusSource::Distinct => {
            info!(lines = seed.len(), "Normalizing seed corpus");
            count_vocabulary(normalize_lines(seed, lower))
        }
    };

    PreparedCorpora {
        available_lines,
        representative_vocab,
        available_vocab,
        seed_vocab,
    }
}
