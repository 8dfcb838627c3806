pub mod corpus;
pub mod index;
pub mod scoring;
pub mod table;
pub mod tfidf;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::analysis::corpus::Corpus;
use crate::analysis::index::DocumentFrequencyIndex;
use crate::analysis::scoring::{ScoredWords, TfIdfScorer};
use crate::analysis::table::{ResultTable, TableOptions};
use crate::analysis::tfidf::{DefaultTfIdfEngine, TfIdfEngine};
use crate::error::Result;

/// Subcorpus analyzer
///
/// Indexes the reference corpus once and scores any number of subcorpora
/// against it. Each call to `analyze` is independent and returns fresh,
/// immutable results.
#[derive(Debug, Clone)]
pub struct SubcorpusAnalyzer<E = DefaultTfIdfEngine>
where
    E: TfIdfEngine,
{
    index: DocumentFrequencyIndex,
    scorer: TfIdfScorer<E>,
    options: TableOptions,
}

/// Output of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub scored: ScoredWords,
    pub table: ResultTable,
}

impl<E> SubcorpusAnalyzer<E>
where
    E: TfIdfEngine,
{
    /// Index the reference corpus
    ///
    /// # Errors
    /// `EmptyCorpus` when the reference corpus has no documents
    pub fn new(reference: &Corpus) -> Result<Self> {
        Ok(SubcorpusAnalyzer {
            index: DocumentFrequencyIndex::index(reference)?,
            scorer: TfIdfScorer::new(),
            options: TableOptions::default(),
        })
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Reference index, read-only
    #[inline]
    pub fn index(&self) -> &DocumentFrequencyIndex {
        &self.index
    }

    /// Score a subcorpus and build its result table
    pub fn analyze(&self, subcorpus: &Corpus) -> Result<Analysis> {
        let scored = self.scorer.score_with_index(&self.index, subcorpus)?;
        let table = ResultTable::build_with(&scored, self.options);
        Ok(Analysis { scored, table })
    }
}
