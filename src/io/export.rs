use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::error::{AnalysisError, Result};
use crate::io::loader::LoadedCorpus;

const METADATA_SPEC: &str = "1.0";

/// Files written by `ResultExporter`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportFormats {
    /// `results.csv`, one row per word
    pub csv: bool,
    /// `results.json`, the scored records
    pub json: bool,
    /// `results.cbor`, the scored records
    pub cbor: bool,
    /// `metadata.yaml`
    pub metadata: bool,
}

impl Default for ExportFormats {
    fn default() -> Self {
        ExportFormats {
            csv: true,
            json: true,
            cbor: false,
            metadata: true,
        }
    }
}

/// Everything one run produced, borrowed for export.
pub struct RunSummary<'a> {
    pub reference: &'a LoadedCorpus,
    pub subcorpus: &'a LoadedCorpus,
    pub analysis: &'a Analysis,
}

#[derive(Debug, Serialize)]
struct Metadata<'a> {
    spec: &'static str,
    metadata: RunInfo,
    data: DataInfo<'a>,
}

#[derive(Debug, Serialize)]
struct RunInfo {
    generated_on: String,
    system_info: SystemInfo,
    word_counts: WordCounts,
}

#[derive(Debug, Serialize)]
struct SystemInfo {
    os: String,
    crate_version: &'static str,
}

#[derive(Debug, Serialize)]
struct WordCounts {
    total_words_analyzed: u64,
    total_unique_words: usize,
}

#[derive(Debug, Serialize)]
struct DataInfo<'a> {
    corpus: CorpusInfo<'a>,
    analysis: CorpusInfo<'a>,
}

#[derive(Debug, Serialize)]
struct CorpusInfo<'a> {
    name: &'a str,
    path: &'a Path,
    file_count: usize,
    files: &'a [PathBuf],
}

impl<'a> CorpusInfo<'a> {
    fn of(loaded: &'a LoadedCorpus) -> Self {
        CorpusInfo {
            name: loaded.corpus.name(),
            path: &loaded.root,
            file_count: loaded.files.len(),
            files: &loaded.files,
        }
    }
}

/// Writes result files into a fresh, timestamped folder.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    results_root: PathBuf,
    formats: ExportFormats,
}

impl ResultExporter {
    pub fn new(results_root: impl Into<PathBuf>) -> Self {
        ResultExporter {
            results_root: results_root.into(),
            formats: ExportFormats::default(),
        }
    }

    pub fn with_formats(mut self, formats: ExportFormats) -> Self {
        self.formats = formats;
        self
    }

    /// Write the enabled files and return the folder holding them.
    pub fn export(&self, run: &RunSummary<'_>) -> Result<PathBuf> {
        let folder = self.create_folder()?;
        if self.formats.csv {
            self.write_csv(&folder.join("results.csv"), run.analysis)?;
        }
        if self.formats.json {
            let path = folder.join("results.json");
            let mut w = create(&path)?;
            serde_json::to_writer_pretty(&mut w, run.analysis.scored.records())?;
            w.flush().map_err(|e| AnalysisError::io(&path, e))?;
        }
        if self.formats.cbor {
            let path = folder.join("results.cbor");
            let mut w = create(&path)?;
            serde_cbor::to_writer(&mut w, &run.analysis.scored)?;
            w.flush().map_err(|e| AnalysisError::io(&path, e))?;
        }
        if self.formats.metadata {
            let path = folder.join("metadata.yaml");
            let mut w = create(&path)?;
            serde_yaml::to_writer(&mut w, &metadata(run))?;
            w.flush().map_err(|e| AnalysisError::io(&path, e))?;
        }
        log::info!("results saved in folder: {}", folder.display());
        Ok(folder)
    }

    /// `results_<YYYYmmdd_HHMMSS>`, suffixed when a run in the same second exists
    fn create_folder(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.results_root).map_err(|e| AnalysisError::io(&self.results_root, e))?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut attempt = 0usize;
        loop {
            let name = match attempt {
                0 => format!("results_{stamp}"),
                n => format!("results_{stamp}_{n}"),
            };
            let folder = self.results_root.join(name);
            match fs::create_dir(&folder) {
                Ok(()) => return Ok(folder),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(AnalysisError::io(&folder, e)),
            }
        }
    }

    fn write_csv(&self, path: &Path, analysis: &Analysis) -> Result<()> {
        let mut w = csv::Writer::from_writer(create(path)?);
        w.write_record([
            "Word",
            "Raw Count",
            "Frequency (%)",
            "Document Frequency",
            "IDF",
            "TF",
            "TF-IDF",
            "Found in Texts",
        ])?;
        for r in analysis.scored.records() {
            w.write_record(&[
                r.lemma.clone(),
                r.raw_count.to_string(),
                r.frequency_pct.to_string(),
                r.document_frequency.to_string(),
                r.idf.to_string(),
                r.tf.to_string(),
                r.tf_idf.to_string(),
                r.found_in_texts().to_string(),
            ])?;
        }
        w.flush().map_err(|e| AnalysisError::io(path, e))?;
        Ok(())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| AnalysisError::io(path, e))
}

fn metadata<'a>(run: &'a RunSummary<'a>) -> Metadata<'a> {
    let scored = &run.analysis.scored;
    Metadata {
        spec: METADATA_SPEC,
        metadata: RunInfo {
            generated_on: Local::now().to_rfc3339(),
            system_info: SystemInfo {
                os: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
                crate_version: env!("CARGO_PKG_VERSION"),
            },
            word_counts: WordCounts {
                total_words_analyzed: scored.total_tokens(),
                total_unique_words: scored.len(),
            },
        },
        data: DataInfo {
            corpus: CorpusInfo::of(run.reference),
            analysis: CorpusInfo::of(run.subcorpus),
        },
    }
}
