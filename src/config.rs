use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::table::TableOptions;
use crate::error::{AnalysisError, Result};
use crate::io::export::ExportFormats;

/// How the term frequency factor is computed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// raw count / subcorpus tokens
    #[default]
    Relative,
    /// raw count itself
    RawCount,
}

/// Settings for one analysis run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```yaml
/// corpus_path: greek_texts/texts
/// analysis_path: greek_texts/groups/orphic
/// lemma_table: lemmas.tsv
/// engine: raw_count
/// formats:
///   cbor: true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// reference corpus, a directory or a single `.txt` file
    pub corpus_path: PathBuf,
    /// subcorpus to score against the reference
    pub analysis_path: PathBuf,
    /// name shown for the subcorpus; the last component of `analysis_path` when absent
    pub analysis_name: Option<String>,
    /// two-column form/lemma table; forms are only normalized when absent
    pub lemma_table: Option<PathBuf>,
    /// input files already hold one lemma per word
    pub pre_lemmatized: bool,
    pub engine: EngineKind,
    /// rows printed to the console
    pub top_n: usize,
    /// bars in the console chart, 0 disables it
    pub chart_top: usize,
    pub chart_width: usize,
    pub table: TableOptions,
    pub save_results: bool,
    pub results_dir: PathBuf,
    pub formats: ExportFormats,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            corpus_path: PathBuf::from("greek_texts/texts"),
            analysis_path: PathBuf::from("greek_texts/groups/stoic"),
            analysis_name: None,
            lemma_table: None,
            pre_lemmatized: false,
            engine: EngineKind::default(),
            top_n: 50,
            chart_top: 20,
            chart_width: 40,
            table: TableOptions::default(),
            save_results: false,
            results_dir: PathBuf::from("results"),
            formats: ExportFormats::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let config = Self::from_yaml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pre_lemmatized && self.lemma_table.is_some() {
            return Err(AnalysisError::Config("lemma_table cannot be combined with pre_lemmatized".to_string()));
        }
        if self.corpus_path.as_os_str().is_empty() {
            return Err(AnalysisError::Config("corpus_path is empty".to_string()));
        }
        if self.analysis_path.as_os_str().is_empty() {
            return Err(AnalysisError::Config("analysis_path is empty".to_string()));
        }
        if self.chart_top > 0 && self.chart_width == 0 {
            return Err(AnalysisError::Config("chart_width must be positive when chart_top is set".to_string()));
        }
        Ok(())
    }

    pub fn analysis_name(&self) -> String {
        match &self.analysis_name {
            Some(name) => name.clone(),
            None => self
                .analysis_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "analysis".to_string()),
        }
    }

    pub fn corpus_name(&self) -> String {
        self.corpus_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string())
    }
}
