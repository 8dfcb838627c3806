/// This crate finds the distinctive vocabulary of a subcorpus of lemmatized
/// Ancient Greek texts by TF-IDF against a reference corpus.
pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod text;

/// Subcorpus Analyzer
/// The top-level struct of this crate.
/// It indexes a reference corpus once and scores any number of subcorpora
/// against it, returning the scored words together with a ranked result table.
///
/// `SubcorpusAnalyzer<E>` is generic over the TF-IDF engine `E`
/// (`DefaultTfIdfEngine` when omitted).
pub use analysis::SubcorpusAnalyzer;

/// Output of `SubcorpusAnalyzer::analyze`
/// Holds the `ScoredWords` and the `ResultTable` built from them.
///
/// # Serialization
/// Supported.
pub use analysis::Analysis;

/// Corpus
/// A named, ordered collection of lemmatized documents.
/// Document ids are unique; insertion order is kept so every table derived
/// from a corpus is reproducible.
///
/// Subcorpora are built with `Corpus::subcorpus` (by id) or `Corpus::filter`.
pub use analysis::corpus::Corpus;

/// One lemmatized document of a `Corpus`
pub use analysis::corpus::Document;

/// Document Frequency Index
/// Built once from the reference corpus. For every lemma it keeps the
/// documents it occurs in with their occurrence counts, and it knows the
/// corpus totals IDF needs.
///
/// Read-only once built; safe to share between threads.
pub use analysis::index::DocumentFrequencyIndex;

/// Token Frequency structure
/// Occurrence counts of lemmas within one document or one subcorpus.
/// It manages:
/// - The count of occurrences of each lemma
/// - The total number of lemma tokens
///
/// Iteration follows first-occurrence order.
pub use analysis::token::TokenFrequency;

/// A lemma occurrence tagged with its source document
pub use analysis::token::LemmaToken;

/// TF IDF Calculation Engine Trait
/// Defines how TF, IDF and their product are computed.
///
/// By implementing this trait, you can plug different weighting strategies
/// into `TfIdfScorer<E>` and `SubcorpusAnalyzer<E>`.
/// - `DefaultTfIdfEngine`: tf = count / total tokens, idf = ln(N / df)
/// - `RawCountTfIdfEngine`: tf = count, idf = ln(N / df)
pub use analysis::tfidf::{DefaultTfIdfEngine, RawCountTfIdfEngine, TfIdfEngine};

/// TF-IDF Scorer
/// Scores every lemma of a subcorpus against a reference corpus.
/// Records are ordered by TF-IDF descending, then raw count descending,
/// then lemma ascending.
///
/// # Errors
/// - `EmptyCorpus` when either corpus has no documents
/// - `EmptySubcorpus` when the subcorpus holds no tokens
/// - `CorpusConsistency` when a subcorpus lemma never occurs in the reference
pub use analysis::scoring::{ScoredWords, TfIdfScorer, WordStatistic};

/// Result Table
/// Ranked presentation of `ScoredWords` with formatted frequency labels,
/// a text rendering (`Display`) and a console bar chart.
pub use analysis::table::{ResultTable, TableOptions, TableRow};

/// Analysis configuration, read from YAML
pub use config::{AnalysisConfig, EngineKind};

/// Error type of this crate
pub use error::{AnalysisError, Result};

/// Text to lemma stream
/// `Lemmatizer` is the seam; `DictionaryLemmatizer` looks forms up in a
/// form/lemma table after `GreekNormalizer` cleanup, `PreLemmatized` takes
/// whitespace-separated lemmas as they are.
pub use text::lemmatizer::{DictionaryLemmatizer, Lemmatizer, PreLemmatized};

/// Ancient Greek text normalizer
/// NFC composition, editorial marker removal, punctuation stripping,
/// lowercasing and grave to acute folding.
pub use text::normalizer::GreekNormalizer;

/// Corpus Loader
/// Reads a `.txt` file or a directory tree of them into a `Corpus`.
pub use io::loader::{CorpusLoader, LoadedCorpus};

/// Result Exporter
/// Writes CSV, JSON, CBOR and YAML metadata into a timestamped results folder.
pub use io::export::{ExportFormats, ResultExporter, RunSummary};
