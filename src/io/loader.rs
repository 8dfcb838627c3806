use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::corpus::{Corpus, Document};
use crate::error::{AnalysisError, Result};
use crate::text::lemmatizer::Lemmatizer;

const TEXT_EXTENSION: &str = "txt";

/// A corpus together with where it was read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadedCorpus {
    pub corpus: Corpus,
    pub root: PathBuf,
    /// files read, in document order
    pub files: Vec<PathBuf>,
}

/// Reads `.txt` files into a `Corpus` through a lemmatizer.
pub struct CorpusLoader<'a> {
    lemmatizer: &'a dyn Lemmatizer,
}

impl<'a> CorpusLoader<'a> {
    pub fn new(lemmatizer: &'a dyn Lemmatizer) -> Self {
        CorpusLoader { lemmatizer }
    }

    /// Load `path` as the corpus `name`.
    ///
    /// A `.txt` path is a single document. A directory is walked
    /// recursively and each `.txt` file becomes a document whose id is its
    /// path relative to `path`, with `/` separators. Documents are sorted by
    /// id. A directory without text files gives an empty corpus.
    pub fn load(&self, name: &str, path: &Path) -> Result<LoadedCorpus> {
        let files = discover_text_files(path)?;
        let root = if path.is_file() {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            path.to_path_buf()
        };

        let mut docs: Vec<(String, PathBuf)> = files
            .into_iter()
            .map(|file| (document_id(&root, &file), file))
            .collect();
        docs.sort_by(|a, b| a.0.cmp(&b.0));

        // ファイル単位で独立なので並列に読む (順序は collect で保たれる)
        let lemmatized: Vec<(String, Vec<String>)> = docs
            .par_iter()
            .map(|(id, file)| {
                let text = fs::read_to_string(file).map_err(|e| AnalysisError::io(file, e))?;
                Ok((id.clone(), self.lemmatizer.lemmatize(&text)))
            })
            .collect::<Result<_>>()?;

        let mut corpus = Corpus::new(name);
        for (id, lemmas) in lemmatized {
            corpus.add_document(Document::new(&id, &lemmas));
        }
        log::info!(
            "loaded corpus `{}` from {}: {} documents, {} tokens",
            name,
            path.display(),
            corpus.total_documents(),
            corpus.total_tokens()
        );
        if corpus.is_empty() {
            log::warn!("no .{} files found under {}", TEXT_EXTENSION, path.display());
        }

        Ok(LoadedCorpus {
            corpus,
            root,
            files: docs.into_iter().map(|(_, file)| file).collect(),
        })
    }
}

/// All `.txt` files under `path`, or `path` itself when it is one.
pub fn discover_text_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if is_text_file(path) && path.is_file() {
        files.push(path.to_path_buf());
        return Ok(files);
    }
    walk(path, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_text_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

#[inline]
fn is_text_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TEXT_EXTENSION)
}

fn document_id(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
