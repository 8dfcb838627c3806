use std::path::PathBuf;

/// Errors surfaced by the analysis pipeline.
///
/// The first three variants are structural failures of the input corpora.
/// None of them is recoverable by retrying: the computation is pure.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    /// A corpus holds zero documents, so no document frequency is defined.
    #[error("corpus `{corpus}` contains no documents")]
    EmptyCorpus { corpus: String },

    /// The subcorpus holds documents but zero tokens.
    #[error("subcorpus `{corpus}` contains no tokens")]
    EmptySubcorpus { corpus: String },

    /// A subcorpus lemma never occurs in the reference corpus.
    /// The subcorpus was not drawn from the indexed reference corpus.
    #[error("lemma `{lemma}` of subcorpus `{corpus}` does not occur in the reference corpus")]
    CorpusConsistency { lemma: String, corpus: String },

    /// A subcorpus selection names a document the reference corpus does not hold.
    #[error("document `{document}` is not part of corpus `{corpus}`")]
    UnknownDocument { corpus: String, document: String },

    #[error("i/o error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
