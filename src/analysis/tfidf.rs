/// TF-IDF calculation engine
///
/// Supplies the term frequency and inverse document frequency formulas to
/// the scorer. Callers guarantee `total_tokens > 0`, `doc_freq > 0` and
/// `doc_freq <= total_docs` before asking for a value.
pub trait TfIdfEngine {
    /// Term frequency of a lemma inside the subcorpus
    ///
    /// # Arguments
    /// * `raw_count` - occurrences of the lemma in the subcorpus
    /// * `total_tokens` - token count of the subcorpus
    fn tf(raw_count: u64, total_tokens: u64) -> f64;

    /// Inverse document frequency over the reference corpus
    ///
    /// # Arguments
    /// * `total_docs` - document count of the reference corpus
    /// * `doc_freq` - reference documents containing the lemma
    ///
    /// Must be >= 0 and non-increasing in `doc_freq`.
    fn idf(total_docs: u64, doc_freq: u64) -> f64;

    /// Combined weight, product by default
    #[inline]
    fn tfidf(tf: f64, idf: f64) -> f64 {
        tf * idf
    }
}

/// Default TF-IDF engine
///
/// - `tf = raw_count / total_tokens`, always in (0, 1]
/// - `idf = ln(total_docs / doc_freq)`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl TfIdfEngine for DefaultTfIdfEngine {
    #[inline]
    fn tf(raw_count: u64, total_tokens: u64) -> f64 {
        raw_count as f64 / total_tokens as f64
    }

    #[inline]
    fn idf(total_docs: u64, doc_freq: u64) -> f64 {
        // doc_freq == total_docs のとき ln(1) = 0 をそのまま返す
        (total_docs as f64 / doc_freq as f64).ln()
    }
}

/// Raw count weighting
///
/// Same IDF as `DefaultTfIdfEngine` but weighs it by the raw occurrence
/// count instead of the relative frequency. Rankings inside one subcorpus
/// are identical to the default engine; absolute scores are not comparable
/// across subcorpora of different length.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCountTfIdfEngine;

impl TfIdfEngine for RawCountTfIdfEngine {
    #[inline]
    fn tf(raw_count: u64, _total_tokens: u64) -> f64 {
        raw_count as f64
    }

    #[inline]
    fn idf(total_docs: u64, doc_freq: u64) -> f64 {
        DefaultTfIdfEngine::idf(total_docs, doc_freq)
    }
}
