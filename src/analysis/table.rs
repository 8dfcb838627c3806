use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::scoring::{ScoredWords, WordStatistic};

/// Presentation options of a result table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableOptions {
    /// decimals of the formatted frequency percentage
    pub percent_decimals: usize,
    /// decimals of IDF / TF-IDF in the text rendering
    pub score_decimals: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            percent_decimals: 2,
            score_decimals: 6,
        }
    }
}

/// One ranked row: the scored record plus derived display fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    /// 1-based position in TF-IDF order
    pub rank: usize,
    pub frequency_label: String,
    pub found_in_texts: usize,
    #[serde(flatten)]
    pub record: WordStatistic,
}

/// Ordered, finalized table handed to exporters.
///
/// Built from `ScoredWords` without recomputing anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultTable {
    pub reference: String,
    pub subcorpus: String,
    pub reference_documents: u64,
    pub subcorpus_documents: u64,
    pub total_tokens: u64,
    options: TableOptions,
    rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn build(scored: &ScoredWords) -> Self {
        Self::build_with(scored, TableOptions::default())
    }

    pub fn build_with(scored: &ScoredWords, options: TableOptions) -> Self {
        let rows = scored
            .iter()
            .enumerate()
            .map(|(i, record)| TableRow {
                rank: i + 1,
                frequency_label: format!("{:.*}%", options.percent_decimals, record.frequency_pct),
                found_in_texts: record.found_in_texts(),
                record: record.clone(),
            })
            .collect();
        ResultTable {
            reference: scored.reference_name().to_string(),
            subcorpus: scored.subcorpus_name().to_string(),
            reference_documents: scored.reference_documents(),
            subcorpus_documents: scored.subcorpus_documents(),
            total_tokens: scored.total_tokens(),
            options,
            rows,
        }
    }

    #[inline]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in table order
    pub fn records(&self) -> impl Iterator<Item = &WordStatistic> {
        self.rows.iter().map(|row| &row.record)
    }

    /// New table holding the first `n` rows
    pub fn top(&self, n: usize) -> ResultTable {
        ResultTable {
            reference: self.reference.clone(),
            subcorpus: self.subcorpus.clone(),
            reference_documents: self.reference_documents,
            subcorpus_documents: self.subcorpus_documents,
            total_tokens: self.total_tokens,
            options: self.options,
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Horizontal bar chart of raw counts for the top `n` words by TF-IDF.
    ///
    /// The longest bar is `width` cells wide, every row with a count gets at
    /// least one cell.
    pub fn bar_chart(&self, n: usize, width: usize) -> String {
        let rows: Vec<&TableRow> = self.rows.iter().take(n).collect();
        let max_count = rows.iter().map(|r| r.record.raw_count).max().unwrap_or(0);
        let label_w = rows.iter().map(|r| r.record.lemma.chars().count()).max().unwrap_or(0);

        let mut out = format!("Top {} words by TF-IDF (bars: occurrences in `{}`)\n", rows.len(), self.subcorpus);
        for row in rows {
            let count = row.record.raw_count;
            let cells = if max_count == 0 {
                0
            } else {
                ((count as f64 / max_count as f64) * width as f64).round().max(1.0) as usize
            };
            let pad = label_w - row.record.lemma.chars().count();
            out.push_str(&format!(
                "{}{} | {} {}\n",
                row.record.lemma,
                " ".repeat(pad),
                "█".repeat(cells),
                count
            ));
        }
        out
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.options.score_decimals;
        writeln!(
            f,
            "{} vs {} ({} / {} documents, {} tokens)",
            self.subcorpus, self.reference, self.subcorpus_documents, self.reference_documents, self.total_tokens
        )?;
        writeln!(f, "{:>5}  {:<20} {:>6} {:>9} {:>5} {:>10} {:>10} {:>5}", "rank", "word", "raw", "freq", "df", "idf", "tf-idf", "texts")?;
        for row in &self.rows {
            // ギリシャ文字は幅が揃わないので char 数で埋める
            let pad = 20usize.saturating_sub(row.record.lemma.chars().count());
            writeln!(
                f,
                "{:>5}  {}{} {:>6} {:>9} {:>5} {:>10.*} {:>10.*} {:>5}",
                row.rank,
                row.record.lemma,
                " ".repeat(pad),
                row.record.raw_count,
                row.frequency_label,
                row.record.document_frequency,
                d,
                row.record.idf,
                d,
                row.record.tf_idf,
                row.found_in_texts
            )?;
        }
        Ok(())
    }
}
