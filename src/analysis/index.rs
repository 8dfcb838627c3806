use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::corpus::Corpus;
use crate::analysis::token::TokenFrequency;
use crate::error::Result;

/// Per-document occurrence counts of one lemma.
/// Only documents with a count > 0 are present.
pub type Postings = IndexMap<Box<str>, u64>;

/// Lemma → document → count over one corpus.
///
/// Built once per run and read-only afterwards.
/// Lemmas are ordered by first occurrence in corpus order, and postings by
/// document order, so the structure does not depend on how documents were
/// counted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentFrequencyIndex {
    corpus_name: String,
    doc_num: u64,
    token_sum: u64,
    postings: IndexMap<Box<str>, Postings>,
}

impl DocumentFrequencyIndex {
    /// Index a non-empty corpus.
    ///
    /// # Errors
    /// `EmptyCorpus` when the corpus holds no documents.
    /// Documents without tokens are fine and only count towards `total_documents`.
    pub fn index(corpus: &Corpus) -> Result<Self> {
        corpus.ensure_not_empty()?;

        // 文書ごとのカウントは独立なので並列に数え、corpus順に畳み込む
        let per_doc: Vec<(&str, TokenFrequency)> = corpus
            .documents()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|doc| (doc.id(), doc.token_frequency()))
            .collect();

        let mut postings: IndexMap<Box<str>, Postings> = IndexMap::new();
        let mut token_sum = 0u64;
        for (doc_id, freq) in per_doc.iter() {
            token_sum += freq.token_sum();
            for (lemma, count) in freq.iter() {
                postings
                    .entry(lemma.into())
                    .or_insert_with(IndexMap::new)
                    .insert((*doc_id).into(), count);
            }
        }

        log::debug!(
            "indexed corpus `{}`: {} documents, {} tokens, {} lemmas",
            corpus.name(),
            corpus.total_documents(),
            token_sum,
            postings.len()
        );

        Ok(DocumentFrequencyIndex {
            corpus_name: corpus.name().to_string(),
            doc_num: corpus.total_documents(),
            token_sum,
            postings,
        })
    }

    #[inline]
    pub fn corpus_name(&self) -> &str {
        &self.corpus_name
    }

    /// Number of documents containing `lemma`, 0 when unseen
    #[inline]
    pub fn document_frequency(&self, lemma: &str) -> u64 {
        self.postings.get(lemma).map_or(0, |p| p.len() as u64)
    }

    /// Number of indexed documents, the IDF denominator base
    #[inline]
    pub fn total_documents(&self) -> u64 {
        self.doc_num
    }

    /// Number of tokens over all indexed documents
    #[inline]
    pub fn total_tokens(&self) -> u64 {
        self.token_sum
    }

    /// Number of distinct lemmas
    #[inline]
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    #[inline]
    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.postings.contains_key(lemma)
    }

    /// Per-document counts of a lemma
    #[inline]
    pub fn postings(&self, lemma: &str) -> Option<&Postings> {
        self.postings.get(lemma)
    }

    /// Count of `lemma` inside one document
    pub fn count_in(&self, lemma: &str, doc_id: &str) -> u64 {
        self.postings
            .get(lemma)
            .and_then(|p| p.get(doc_id))
            .copied()
            .unwrap_or(0)
    }

    /// Ids of the documents containing `lemma`, in corpus order
    pub fn documents_containing(&self, lemma: &str) -> Vec<&str> {
        self.postings
            .get(lemma)
            .map(|p| p.keys().map(|k| k.as_ref()).collect())
            .unwrap_or_default()
    }

    /// Summed counts over the whole corpus
    pub fn corpus_frequency(&self) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        for (lemma, postings) in self.postings.iter() {
            freq.add_token_n(lemma, postings.values().sum());
        }
        freq
    }

    /// Iterate `(lemma, postings)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Postings)> {
        self.postings.iter().map(|(lemma, p)| (lemma.as_ref(), p))
    }
}
