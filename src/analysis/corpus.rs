use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::token::{LemmaToken, TokenFrequency};
use crate::error::{AnalysisError, Result};

/// One poem or excerpt, as an ordered stream of lemmas.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: Box<str>,
    lemmas: Vec<String>,
}

impl Document {
    pub fn new<T>(id: &str, lemmas: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Document {
            id: id.into(),
            lemmas: lemmas.iter().map(|l| l.as_ref().to_string()).collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn lemmas(&self) -> &[String] {
        &self.lemmas
    }

    #[inline]
    pub fn token_len(&self) -> usize {
        self.lemmas.len()
    }

    /// The lemma stream as tokens tagged with this document
    pub fn tokens(&self) -> Vec<LemmaToken> {
        self.lemmas
            .iter()
            .map(|lemma| LemmaToken::new(lemma, &self.id))
            .collect()
    }

    /// Bag of lemma counts, token order dropped
    pub fn token_frequency(&self) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&self.lemmas);
        freq
    }
}

/// Named collection of documents.
///
/// Documents are keyed by id; inserting an id twice replaces the earlier
/// document. Iteration follows insertion order so every derived table is
/// reproducible.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    name: String,
    documents: IndexMap<Box<str>, Document>,
}

impl Corpus {
    pub fn new(name: &str) -> Self {
        Corpus {
            name: name.to_string(),
            documents: IndexMap::new(),
        }
    }

    /// Build a corpus from `(id, lemmas)` pairs
    pub fn from_lemma_streams<I, S, T>(name: &str, streams: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<T>)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut corpus = Corpus::new(name);
        for (id, lemmas) in streams {
            corpus.add_document(Document::new(id.as_ref(), &lemmas));
        }
        corpus
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a document, returning the one it replaced
    pub fn add_document(&mut self, doc: Document) -> Option<Document> {
        self.documents.insert(doc.id.clone(), doc)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    #[inline]
    pub fn contains_doc(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Document count, the base of IDF
    #[inline]
    pub fn total_documents(&self) -> u64 {
        self.documents.len() as u64
    }

    /// Number of tokens over all documents
    pub fn total_tokens(&self) -> u64 {
        self.documents.values().map(|d| d.token_len() as u64).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn documents(&self) -> impl ExactSizeIterator<Item = &Document> {
        self.documents.values()
    }

    #[inline]
    pub fn document_ids(&self) -> impl ExactSizeIterator<Item = &str> {
        self.documents.keys().map(|k| k.as_ref())
    }

    /// Fail with `EmptyCorpus` when no document is held
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.documents.is_empty() {
            return Err(AnalysisError::EmptyCorpus { corpus: self.name.clone() });
        }
        Ok(())
    }

    /// Select a named subcorpus out of this corpus.
    /// Every id must exist here, which keeps the subcorpus consistent
    /// with this corpus's document frequencies.
    pub fn subcorpus<S>(&self, name: &str, ids: &[S]) -> Result<Corpus>
    where
        S: AsRef<str>,
    {
        let mut sub = Corpus::new(name);
        for id in ids {
            let doc = self.documents.get(id.as_ref()).ok_or_else(|| AnalysisError::UnknownDocument {
                corpus: self.name.clone(),
                document: id.as_ref().to_string(),
            })?;
            sub.add_document(doc.clone());
        }
        Ok(sub)
    }

    /// Select the documents whose id matches the predicate
    pub fn filter<F>(&self, name: &str, predicate: F) -> Corpus
    where
        F: Fn(&Document) -> bool,
    {
        let mut sub = Corpus::new(name);
        for doc in self.documents.values().filter(|d| predicate(d)) {
            sub.add_document(doc.clone());
        }
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Corpus {
        Corpus::from_lemma_streams(
            "texts",
            vec![
                ("hymn/zeus.txt", vec!["ζεύς", "ἄναξ", "ζεύς"]),
                ("hymn/hera.txt", vec!["ἥρα", "ἄναξ"]),
                ("stoic/cleanthes.txt", vec!["ζεύς", "λόγος"]),
            ],
        )
    }

    #[test]
    fn counts_documents_and_tokens() {
        let corpus = reference();
        assert_eq!(corpus.name(), "texts");
        assert_eq!(corpus.total_documents(), 3);
        assert_eq!(corpus.total_tokens(), 7);
        assert_eq!(
            corpus.document_ids().collect::<Vec<_>>(),
            vec!["hymn/zeus.txt", "hymn/hera.txt", "stoic/cleanthes.txt"]
        );
    }

    #[test]
    fn same_id_replaces_document() {
        let mut corpus = reference();
        let old = corpus.add_document(Document::new("hymn/hera.txt", &["ἥρα"]));
        assert_eq!(old.map(|d| d.token_len()), Some(2));
        assert_eq!(corpus.total_documents(), 3);
        assert_eq!(corpus.total_tokens(), 6);
    }

    #[test]
    fn subcorpus_copies_selected_documents() {
        let sub = reference().subcorpus("zeus", &["hymn/zeus.txt", "stoic/cleanthes.txt"]).unwrap();
        assert_eq!(sub.name(), "zeus");
        assert_eq!(sub.total_documents(), 2);
        assert!(sub.contains_doc("stoic/cleanthes.txt"));
        assert!(!sub.contains_doc("hymn/hera.txt"));
    }

    #[test]
    fn subcorpus_rejects_unknown_id() {
        let err = reference().subcorpus("zeus", &["missing.txt"]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownDocument { ref document, .. } if document == "missing.txt"));
    }

    #[test]
    fn filter_by_prefix() {
        let hymns = reference().filter("hymns", |d| d.id().starts_with("hymn/"));
        assert_eq!(hymns.total_documents(), 2);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = Corpus::new("void").ensure_not_empty().unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyCorpus { ref corpus } if corpus == "void"));
    }

    #[test]
    fn document_tokens_and_frequency() {
        let doc = Document::new("a.txt", &["θεός", "θεός", "μέγας"]);
        let tokens = doc.tokens();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t.document() == "a.txt"));
        assert_eq!(doc.token_frequency().token_count("θεός"), 2);
    }
}
