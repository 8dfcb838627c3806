use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use grc_tfidf::{
    Analysis, AnalysisConfig, Corpus, CorpusLoader, DefaultTfIdfEngine, DictionaryLemmatizer, EngineKind,
    GreekNormalizer, Lemmatizer, PreLemmatized, RawCountTfIdfEngine, ResultExporter, RunSummary, SubcorpusAnalyzer,
    TableOptions, TfIdfEngine,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Find the words that set a group of Greek texts apart from the wider corpus
struct Args {
    /// YAML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Reference corpus directory or `.txt` file
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Subcorpus directory or `.txt` file
    #[arg(long)]
    analysis: Option<PathBuf>,
    /// Two-column form/lemma table (.tsv or .csv)
    #[arg(long)]
    lemma_table: Option<PathBuf>,
    /// Input already holds one lemma per word
    #[arg(long)]
    pre_lemmatized: bool,
    #[arg(long, value_enum)]
    engine: Option<EngineKind>,
    /// Rows to print
    #[arg(short = 'n', long)]
    top_n: Option<usize>,
    /// Bars in the chart, 0 disables it
    #[arg(long)]
    chart_top: Option<usize>,
    /// Save results into a timestamped folder
    #[arg(short, long)]
    save: bool,
    #[arg(long)]
    results_dir: Option<PathBuf>,
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    log_level: log::LevelFilter,
}

impl Args {
    fn into_config(self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_path(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(p) = self.corpus {
            config.corpus_path = p;
        }
        if let Some(p) = self.analysis {
            config.analysis_path = p;
            config.analysis_name = None;
        }
        if let Some(p) = self.lemma_table {
            config.lemma_table = Some(p);
        }
        config.pre_lemmatized |= self.pre_lemmatized;
        if let Some(e) = self.engine {
            config.engine = e;
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(n) = self.chart_top {
            config.chart_top = n;
        }
        config.save_results |= self.save;
        if let Some(p) = self.results_dir {
            config.results_dir = p;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn analyze<E: TfIdfEngine>(reference: &Corpus, subcorpus: &Corpus, options: TableOptions) -> anyhow::Result<Analysis> {
    let analyzer = SubcorpusAnalyzer::<E>::new(reference)?.with_options(options);
    Ok(analyzer.analyze(subcorpus)?)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level)?;
    let config = args.into_config().context("invalid configuration")?;

    let lemmatizer: Box<dyn Lemmatizer> = match (&config.lemma_table, config.pre_lemmatized) {
        (_, true) => Box::new(PreLemmatized),
        (Some(table), false) => Box::new(DictionaryLemmatizer::from_table_path(GreekNormalizer::new(), table)?),
        (None, false) => Box::new(DictionaryLemmatizer::default()),
    };
    let loader = CorpusLoader::new(lemmatizer.as_ref());

    let reference = loader
        .load(&config.corpus_name(), &config.corpus_path)
        .with_context(|| format!("reading corpus {}", config.corpus_path.display()))?;
    let subcorpus = loader
        .load(&config.analysis_name(), &config.analysis_path)
        .with_context(|| format!("reading analysis group {}", config.analysis_path.display()))?;

    let analysis = match config.engine {
        EngineKind::Relative => analyze::<DefaultTfIdfEngine>(&reference.corpus, &subcorpus.corpus, config.table)?,
        EngineKind::RawCount => analyze::<RawCountTfIdfEngine>(&reference.corpus, &subcorpus.corpus, config.table)?,
    };

    println!("{}", analysis.table.top(config.top_n));
    if config.chart_top > 0 {
        println!("{}", analysis.table.bar_chart(config.chart_top, config.chart_width));
    }

    if config.save_results {
        let run = RunSummary {
            reference: &reference,
            subcorpus: &subcorpus,
            analysis: &analysis,
        };
        let folder = ResultExporter::new(&config.results_dir)
            .with_formats(config.formats)
            .export(&run)
            .context("saving results")?;
        println!("Results saved in folder: {}", folder.display());
    }
    Ok(())
}
