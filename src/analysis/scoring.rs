use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::corpus::Corpus;
use crate::analysis::index::DocumentFrequencyIndex;
use crate::analysis::tfidf::{DefaultTfIdfEngine, TfIdfEngine};
use crate::error::{AnalysisError, Result};

/// Significant digits of TF-IDF used for ranking.
/// Products that are equal on paper can differ in the last ulp, e.g.
/// `1/3 * ln(16/9)` and `2/3 * ln(16/12)`.
const RANK_SIGNIFICANT_DIGITS: i32 = 12;

/// `score` rounded to `RANK_SIGNIFICANT_DIGITS` significant digits.
/// Derived per value, so comparing the results stays a total order.
fn rank_score(score: f64) -> f64 {
    if score == 0.0 || !score.is_finite() {
        return score;
    }
    let exp = RANK_SIGNIFICANT_DIGITS - 1 - score.abs().log10().floor() as i32;
    let scale = 10f64.powi(exp);
    (score * scale).round() / scale
}

/// Scored statistics of one subcorpus lemma.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WordStatistic {
    pub lemma: String,
    /// occurrences inside the subcorpus
    pub raw_count: u64,
    /// raw_count / subcorpus tokens * 100
    pub frequency_pct: f64,
    /// reference documents containing the lemma
    pub document_frequency: u64,
    pub tf: f64,
    pub idf: f64,
    pub tf_idf: f64,
    /// subcorpus documents containing the lemma, sorted by id
    pub found_in: Vec<String>,
}

impl WordStatistic {
    /// Number of subcorpus documents containing the lemma
    #[inline]
    pub fn found_in_texts(&self) -> usize {
        self.found_in.len()
    }

    /// Ranking order: TF-IDF desc, raw count desc, lemma asc.
    /// Scores equal to `RANK_SIGNIFICANT_DIGITS` digits count as a tie.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        rank_score(other.tf_idf)
            .total_cmp(&rank_score(self.tf_idf))
            .then_with(|| other.raw_count.cmp(&self.raw_count))
            .then_with(|| self.lemma.cmp(&other.lemma))
    }
}

/// Immutable result of one scoring run, ranked by TF-IDF.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoredWords {
    reference: String,
    subcorpus: String,
    reference_documents: u64,
    subcorpus_documents: u64,
    total_tokens: u64,
    records: Vec<WordStatistic>,
}

impl ScoredWords {
    /// Records in ranking order
    #[inline]
    pub fn records(&self) -> &[WordStatistic] {
        &self.records
    }

    pub fn get(&self, lemma: &str) -> Option<&WordStatistic> {
        self.records.iter().find(|r| r.lemma == lemma)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, WordStatistic> {
        self.records.iter()
    }

    /// Token count of the subcorpus
    #[inline]
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    #[inline]
    pub fn reference_name(&self) -> &str {
        &self.reference
    }

    #[inline]
    pub fn subcorpus_name(&self) -> &str {
        &self.subcorpus
    }

    #[inline]
    pub fn reference_documents(&self) -> u64 {
        self.reference_documents
    }

    #[inline]
    pub fn subcorpus_documents(&self) -> u64 {
        self.subcorpus_documents
    }

    /// New view ordered by raw count desc, then lemma asc
    pub fn by_raw_count(&self) -> Vec<&WordStatistic> {
        let mut view: Vec<&WordStatistic> = self.records.iter().collect();
        view.sort_by(|a, b| b.raw_count.cmp(&a.raw_count).then_with(|| a.lemma.cmp(&b.lemma)));
        view
    }

    /// New view in lemma order
    pub fn alphabetical(&self) -> Vec<&WordStatistic> {
        let mut view: Vec<&WordStatistic> = self.records.iter().collect();
        view.sort_by(|a, b| a.lemma.cmp(&b.lemma));
        view
    }
}

impl<'a> IntoIterator for &'a ScoredWords {
    type Item = &'a WordStatistic;
    type IntoIter = std::slice::Iter<'a, WordStatistic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Subcorpus lemma counts, summed over documents.
struct SubcorpusCounts<'a> {
    total_tokens: u64,
    /// lemma -> (raw count, containing documents)
    lemmas: IndexMap<&'a str, (u64, Vec<&'a str>)>,
}

impl<'a> SubcorpusCounts<'a> {
    fn count(subcorpus: &'a Corpus) -> Self {
        let mut lemmas: IndexMap<&'a str, (u64, Vec<&'a str>)> = IndexMap::new();
        let mut total_tokens = 0u64;
        for doc in subcorpus.documents() {
            for lemma in doc.lemmas() {
                let entry = lemmas.entry(lemma.as_str()).or_insert_with(|| (0, Vec::new()));
                entry.0 += 1;
                if entry.1.last() != Some(&doc.id()) {
                    entry.1.push(doc.id());
                }
                total_tokens += 1;
            }
        }
        SubcorpusCounts { total_tokens, lemmas }
    }
}

/// TF-IDF scorer
///
/// Term frequency is taken inside the subcorpus, document frequency against
/// the reference corpus: words common in the theme group but rare across
/// the broader tradition rise to the top.
///
/// `E` supplies the formulas, `DefaultTfIdfEngine` unless stated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfScorer<E = DefaultTfIdfEngine>
where
    E: TfIdfEngine,
{
    _marker: PhantomData<E>,
}

impl<E> TfIdfScorer<E>
where
    E: TfIdfEngine,
{
    pub fn new() -> Self {
        TfIdfScorer { _marker: PhantomData }
    }

    /// Index `reference` and score `subcorpus` against it.
    ///
    /// # Errors
    /// - `EmptyCorpus` if either corpus has no documents
    /// - `EmptySubcorpus` if the subcorpus has no tokens
    /// - `CorpusConsistency` if a subcorpus lemma is absent from `reference`
    pub fn score(&self, reference: &Corpus, subcorpus: &Corpus) -> Result<ScoredWords> {
        let index = DocumentFrequencyIndex::index(reference)?;
        self.score_with_index(&index, subcorpus)
    }

    /// Score `subcorpus` against an already built reference index.
    pub fn score_with_index(&self, index: &DocumentFrequencyIndex, subcorpus: &Corpus) -> Result<ScoredWords> {
        subcorpus.ensure_not_empty()?;
        let counts = SubcorpusCounts::count(subcorpus);
        if counts.total_tokens == 0 {
            return Err(AnalysisError::EmptySubcorpus {
                corpus: subcorpus.name().to_string(),
            });
        }

        let total_docs = index.total_documents();
        let mut records = Vec::with_capacity(counts.lemmas.len());
        for (lemma, (raw_count, mut found_in)) in counts.lemmas {
            // 挿入順に依存しないよう id 順にそろえる
            found_in.sort_unstable();
            let doc_freq = index.document_frequency(lemma);
            if doc_freq == 0 {
                return Err(AnalysisError::CorpusConsistency {
                    lemma: lemma.to_string(),
                    corpus: subcorpus.name().to_string(),
                });
            }
            let tf = E::tf(raw_count, counts.total_tokens);
            let idf = E::idf(total_docs, doc_freq);
            records.push(WordStatistic {
                lemma: lemma.to_string(),
                raw_count,
                frequency_pct: raw_count as f64 / counts.total_tokens as f64 * 100.0,
                document_frequency: doc_freq,
                tf,
                idf,
                tf_idf: E::tfidf(tf, idf),
                found_in: found_in.into_iter().map(str::to_string).collect(),
            });
        }
        records.sort_by(WordStatistic::rank_cmp);

        log::info!(
            "scored {} lemmas of subcorpus `{}` ({} documents, {} tokens) against `{}` ({} documents)",
            records.len(),
            subcorpus.name(),
            subcorpus.total_documents(),
            counts.total_tokens,
            index.corpus_name(),
            total_docs
        );

        Ok(ScoredWords {
            reference: index.corpus_name().to_string(),
            subcorpus: subcorpus.name().to_string(),
            reference_documents: total_docs,
            subcorpus_documents: subcorpus.total_documents(),
            total_tokens: counts.total_tokens,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tfidf::RawCountTfIdfEngine;
    use float_cmp::approx_eq;

    /// 4 reference documents; "a" holds θεός three times among 10 tokens.
    fn reference() -> Corpus {
        Corpus::from_lemma_streams(
            "texts",
            vec![
                ("a", vec!["θεός", "θεός", "θεός", "καί", "ζεύς", "ζεύς", "ἄναξ", "μέγας", "ὕμνος", "ἀείδω"]),
                ("b", vec!["καί", "ζεύς", "ἥρα"]),
                ("c", vec!["καί", "ζεύς", "λόγος"]),
                ("d", vec!["καί", "ἄναξ", "νύξ"]),
            ],
        )
    }

    fn scorer() -> TfIdfScorer {
        TfIdfScorer::new()
    }

    #[test]
    fn single_document_scenario() {
        let reference = reference();
        let sub = reference.subcorpus("orphic", &["a"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();

        let theos = scored.get("θεός").unwrap();
        assert_eq!(theos.raw_count, 3);
        assert_eq!(theos.document_frequency, 1);
        assert!(approx_eq!(f64, theos.tf, 0.3, ulps = 2));
        assert!(approx_eq!(f64, theos.idf, 4f64.ln(), ulps = 2));
        assert!((theos.tf_idf - 0.416).abs() < 1e-3);
        assert!(approx_eq!(f64, theos.frequency_pct, 30.0, epsilon = 1e-9));
        assert_eq!(theos.found_in, vec!["a".to_string()]);
        // θεός has the highest count among df == 1 lemmas
        assert_eq!(scored.records()[0].lemma, "θεός");
    }

    #[test]
    fn lemma_in_every_document_scores_zero() {
        let reference = reference();
        let sub = reference.subcorpus("orphic", &["a"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();

        let kai = scored.get("καί").unwrap();
        assert_eq!(kai.document_frequency, 4);
        assert_eq!(kai.idf, 0.0);
        assert_eq!(kai.tf_idf, 0.0);
        assert_eq!(scored.records().last().map(|r| r.lemma.as_str()), Some("καί"));
    }

    #[test]
    fn subcorpus_outside_reference_is_inconsistent() {
        let reference = reference();
        let sub = Corpus::from_lemma_streams("stray", vec![("x", vec!["ζεύς", "κρόνος"])]);
        let err = scorer().score(&reference, &sub).unwrap_err();
        match err {
            AnalysisError::CorpusConsistency { lemma, corpus } => {
                assert_eq!(lemma, "κρόνος");
                assert_eq!(corpus, "stray");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let reference = reference();
        let err = scorer().score(&reference, &Corpus::new("none")).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyCorpus { ref corpus } if corpus == "none"));

        let silent = Corpus::from_lemma_streams("silent", vec![("a", Vec::<&str>::new())]);
        let err = scorer().score(&reference, &silent).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySubcorpus { ref corpus } if corpus == "silent"));

        let err = scorer().score(&Corpus::new("void"), &reference).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyCorpus { ref corpus } if corpus == "void"));
    }

    #[test]
    fn conservation_and_completeness() {
        let reference = reference();
        let sub = reference.subcorpus("zeus", &["a", "b", "c"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();

        assert_eq!(scored.iter().map(|r| r.raw_count).sum::<u64>(), sub.total_tokens());
        assert_eq!(scored.total_tokens(), sub.total_tokens());

        let mut lemmas: Vec<&str> = scored.iter().map(|r| r.lemma.as_str()).collect();
        lemmas.sort();
        let before = lemmas.len();
        lemmas.dedup();
        assert_eq!(before, lemmas.len());

        let expected = sub.documents().flat_map(|d| d.lemmas().iter()).collect::<std::collections::HashSet<_>>();
        assert_eq!(lemmas.len(), expected.len());
    }

    #[test]
    fn bounds_hold() {
        let reference = reference();
        let sub = reference.subcorpus("zeus", &["a", "b"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();
        for r in &scored {
            assert!(r.idf >= 0.0);
            assert!(r.tf > 0.0 && r.tf <= 1.0);
            assert!(r.document_frequency <= scored.reference_documents());
        }
    }

    #[test]
    fn lower_document_frequency_scores_higher() {
        // ἥρα and ζεύς both occur once in "b", ζεύς is spread wider
        let reference = reference();
        let sub = reference.subcorpus("b", &["b"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();
        let hera = scored.get("ἥρα").unwrap();
        let zeus = scored.get("ζεύς").unwrap();
        assert_eq!(hera.tf, zeus.tf);
        assert!(hera.document_frequency < zeus.document_frequency);
        assert!(hera.tf_idf > zeus.tf_idf);
    }

    #[test]
    fn ties_break_by_count_then_lemma() {
        let reference = Corpus::from_lemma_streams(
            "texts",
            vec![
                ("a", vec!["γ", "β", "α", "α"]),
                ("b", vec!["α", "β", "γ", "δ"]),
            ],
        );
        let sub = reference.subcorpus("a", &["a"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();
        // all idf == 0, so count then lemma decides
        let order: Vec<&str> = scored.iter().map(|r| r.lemma.as_str()).collect();
        assert_eq!(order, vec!["α", "β", "γ"]);
    }

    #[test]
    fn found_in_lists_subcorpus_documents() {
        let reference = reference();
        let sub = reference.subcorpus("zeus", &["a", "c", "d"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();
        let anax = scored.get("ἄναξ").unwrap();
        assert_eq!(anax.found_in, vec!["a".to_string(), "d".to_string()]);
        assert_eq!(anax.found_in_texts(), 2);
    }

    #[test]
    fn insertion_order_does_not_change_results() {
        let docs = vec![
            ("x", vec!["θεός", "ζεύς"]),
            ("y", vec!["θεός", "νύξ"]),
            ("z", vec!["λόγος"]),
        ];
        let mut reversed = docs.clone();
        reversed.reverse();
        let a = Corpus::from_lemma_streams("texts", docs);
        let b = Corpus::from_lemma_streams("texts", reversed);
        assert_eq!(a, b);

        let sa = a.subcorpus("group", &["x", "y"]).unwrap();
        let sb = b.subcorpus("group", &["y", "x"]).unwrap();
        let ra = scorer().score(&a, &sa).unwrap();
        let rb = scorer().score(&b, &sb).unwrap();
        assert_eq!(ra, rb);
        assert_eq!(ra.get("θεός").unwrap().found_in, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn equal_scores_with_rounding_noise_tie_on_count() {
        // N = 16; λόγος: count 1, df 9; θεός: count 2, df 12.
        // 1/3 * ln(16/9) == 2/3 * ln(4/3) on paper.
        let mut streams = vec![("d00".to_string(), vec!["λόγος", "θεός", "θεός"])];
        for i in 1..16 {
            let lemmas = match i {
                1..=8 => vec!["λόγος", "θεός"],
                9..=11 => vec!["θεός"],
                _ => vec!["νύξ"],
            };
            streams.push((format!("d{i:02}"), lemmas));
        }
        let reference = Corpus::from_lemma_streams("texts", streams);
        let sub = reference.subcorpus("one", &["d00"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();

        let logos = scored.get("λόγος").unwrap();
        let theos = scored.get("θεός").unwrap();
        assert_eq!(logos.document_frequency, 9);
        assert_eq!(theos.document_frequency, 12);
        assert!(approx_eq!(f64, logos.tf_idf, theos.tf_idf, epsilon = 1e-12));
        let order: Vec<&str> = scored.iter().map(|r| r.lemma.as_str()).collect();
        assert_eq!(order, vec!["θεός", "λόγος"]);
    }

    #[test]
    fn rank_score_rounds_relative_to_magnitude() {
        assert_eq!(rank_score(0.0), 0.0);
        assert_eq!(rank_score(1.0 / 3.0 * (16f64 / 9.0).ln()), rank_score(2.0 / 3.0 * (4f64 / 3.0).ln()));
        assert!(rank_score(12345.678) > rank_score(12345.677));
        assert!(rank_score(2e-9) > rank_score(1e-9));
    }

    #[test]
    fn scoring_is_deterministic() {
        let reference = reference();
        let sub = reference.subcorpus("zeus", &["d", "a", "b"]).unwrap();
        let first = scorer().score(&reference, &sub).unwrap();
        let second = scorer().score(&reference, &sub).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn views_do_not_touch_ranking() {
        let reference = reference();
        let sub = reference.subcorpus("zeus", &["a"]).unwrap();
        let scored = scorer().score(&reference, &sub).unwrap();
        let ranked: Vec<String> = scored.iter().map(|r| r.lemma.clone()).collect();

        let by_count = scored.by_raw_count();
        assert_eq!(by_count[0].lemma, "θεός");
        assert_eq!(by_count[1].lemma, "ζεύς");
        let alpha = scored.alphabetical();
        assert!(alpha.windows(2).all(|w| w[0].lemma <= w[1].lemma));

        assert_eq!(scored.iter().map(|r| r.lemma.clone()).collect::<Vec<_>>(), ranked);
    }

    #[test]
    fn raw_count_engine_keeps_the_ranking() {
        let reference = reference();
        let sub = reference.subcorpus("zeus", &["a", "b"]).unwrap();
        let default = scorer().score(&reference, &sub).unwrap();
        let raw = TfIdfScorer::<RawCountTfIdfEngine>::new().score(&reference, &sub).unwrap();

        let a: Vec<&str> = default.iter().map(|r| r.lemma.as_str()).collect();
        let b: Vec<&str> = raw.iter().map(|r| r.lemma.as_str()).collect();
        assert_eq!(a, b);
        let theos = raw.get("θεός").unwrap();
        assert!(approx_eq!(f64, theos.tf_idf, 3.0 * 4f64.ln(), ulps = 2));
    }

    #[test]
    fn reuses_a_prebuilt_index() {
        let reference = reference();
        let index = DocumentFrequencyIndex::index(&reference).unwrap();
        let sub = reference.subcorpus("d", &["d"]).unwrap();
        let scored = scorer().score_with_index(&index, &sub).unwrap();
        assert_eq!(scored.reference_name(), "texts");
        assert_eq!(scored.subcorpus_name(), "d");
        assert_eq!(scored.subcorpus_documents(), 1);
        assert_eq!(scored.len(), 3);
    }
}
