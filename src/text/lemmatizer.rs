use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::text::normalizer::GreekNormalizer;

/// Pseudo-lemmas emitted for punctuation and column markers.
const DROPPED_LEMMAS: &[&str] = &["punc", "col"];

/// Turns raw text into a lemma stream.
///
/// Passed explicitly to the loader, so every run decides which
/// implementation it uses.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, text: &str) -> Vec<String>;
}

/// Text that already holds one lemma per whitespace-delimited word.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreLemmatized;

impl Lemmatizer for PreLemmatized {
    fn lemmatize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Form → lemma table lookup.
///
/// Text goes through `GreekNormalizer` first; forms missing from the table
/// fall back to their normalized spelling.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    normalizer: GreekNormalizer,
    table: HashMap<String, String>,
}

impl DictionaryLemmatizer {
    pub fn new(normalizer: GreekNormalizer) -> Self {
        DictionaryLemmatizer {
            normalizer,
            table: HashMap::new(),
        }
    }

    /// Add `(form, lemma)` entries. Forms are normalized like text tokens.
    pub fn with_entries<I, F, L>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: AsRef<str>,
        L: AsRef<str>,
    {
        for (form, lemma) in entries {
            self.insert(form.as_ref(), lemma.as_ref());
        }
        self
    }

    /// Load a two-column table (`form`, `lemma`), no header.
    /// `.tsv` files are tab separated, anything else comma separated.
    /// Lines starting with `#` are comments.
    pub fn from_table_path(normalizer: GreekNormalizer, path: &Path) -> Result<Self> {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") => b'\t',
            _ => b',',
        };
        let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
        let lemmatizer = Self::from_reader(normalizer, file, delimiter)?;
        log::info!("loaded {} lemma entries from {}", lemmatizer.len(), path.display());
        Ok(lemmatizer)
    }

    pub fn from_reader<R: Read>(normalizer: GreekNormalizer, reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut lemmatizer = DictionaryLemmatizer::new(normalizer);
        for record in rdr.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(form), Some(lemma)) if !form.is_empty() && !lemma.is_empty() => {
                    lemmatizer.insert(form, lemma);
                }
                _ => log::warn!("skipping malformed lemma table row {:?}", record.position().map(|p| p.line())),
            }
        }
        Ok(lemmatizer)
    }

    fn insert(&mut self, form: &str, lemma: &str) {
        if let Some(form) = self.normalizer.normalize_token(form) {
            self.table.insert(form, lemma.to_string());
        }
    }

    /// Number of table entries
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Lemma of one normalized form
    pub fn lemma_of<'a>(&'a self, form: &'a str) -> &'a str {
        self.table.get(form).map_or(form, |l| l.as_str())
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<String> {
        self.normalizer
            .tokens(text)
            .iter()
            .filter_map(|form| {
                let lemma = self.lemma_of(form).to_lowercase();
                if DROPPED_LEMMAS.contains(&lemma.as_str()) {
                    return None;
                }
                // elided δέ
                if lemma == "δ" {
                    return Some("δέ".to_string());
                }
                Some(lemma)
            })
            .collect()
    }
}
