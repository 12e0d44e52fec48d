use anyhow::Context;
use clap::Parser;
use docsearch::dedupe::blocking::candidate_pairs;
use docsearch::dedupe::cluster::{cluster_pairs, score_pairs};
use docsearch::dedupe::labeling::{DEFAULT_SAMPLE_SIZE, console_label, sample_pairs};
use docsearch::dedupe::model::SETTINGS_FILE;
use docsearch::dedupe::output::{MAPPINGS_FILE, write_mappings};
use docsearch::dedupe::records::{RAW_INPUT_FILE, load_records};
use docsearch::dedupe::threshold::{RECALL_WEIGHT, threshold};
use docsearch::dedupe::training::{TRAINING_FILE, save_and_train};
use docsearch::dedupe::{DedupeModel, RecordMap, TrainingPairs};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "keyword-dedupe",
    about = "Learn which curated keywords are duplicates and write merge mappings"
)]
struct Args {
    /// Holds the keyword CSV and receives the mappings TSV
    #[arg(long, default_value = "../data")]
    data_dir: PathBuf,

    /// Holds the learned settings and the labeled training pairs
    #[arg(long, default_value = "../models")]
    models_dir: PathBuf,

    /// Pairs sampled for console labeling
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    #[arg(long, default_value_t = RECALL_WEIGHT)]
    recall_weight: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // 1. Records:
    let input = args.data_dir.join(RAW_INPUT_FILE);
    let records = load_records(&input)
        .with_context(|| format!("Failed to load keywords from {}", input.display()))?;

    // 2. Model, learned or loaded:
    let settings = args.models_dir.join(SETTINGS_FILE);
    let model = if settings.exists() {
        tracing::info!("Reading learned settings from {}", settings.display());
        DedupeModel::load(&settings)
            .with_context(|| format!("Failed to read settings {}", settings.display()))?
    } else {
        learn_model(&args, &records, &settings)?
    };

    // 3. Threshold over blocked pairs:
    tracing::info!("Blocking...");
    let pairs = candidate_pairs(&records);
    let scored = score_pairs(&records, &model, &pairs);
    let scores: Vec<f64> = scored.iter().map(|p| p.score).collect();
    let cutoff = threshold(&scores, args.recall_weight);
    tracing::info!("Scored {} candidate pairs, threshold {:.4}", scored.len(), cutoff);

    // 4. Clustering:
    tracing::info!("Clustering...");
    let clusters = cluster_pairs(&scored, cutoff);
    tracing::info!("# duplicate sets {}", clusters.len());

    // 5. Mappings:
    let output = args.data_dir.join(MAPPINGS_FILE);
    let file = std::fs::File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let written = write_mappings(BufWriter::new(file), &records, &clusters)?;
    tracing::info!("Wrote {} mappings to {}", written, output.display());

    Ok(())
}

fn learn_model(args: &Args, records: &RecordMap, settings: &Path) -> anyhow::Result<DedupeModel> {
    let mut model = DedupeModel::for_keywords();

    let sample = sample_pairs(records, args.sample_size, &mut rand::thread_rng());

    let training_file = args.models_dir.join(TRAINING_FILE);
    let mut training = TrainingPairs::default();
    if training_file.exists() {
        training
            .read_training(&training_file)
            .with_context(|| format!("Failed to read {}", training_file.display()))?;
    }

    tracing::info!("Starting active labeling...");
    let stats = console_label(
        &mut model,
        records,
        &sample,
        &mut training,
        std::io::stdin().lock(),
        std::io::stdout().lock(),
    )?;
    tracing::info!(
        "Labeled {} matches, {} distinct, {} unsure",
        stats.matches,
        stats.distinct,
        stats.unsure
    );

    save_and_train(&mut model, &training, &training_file, settings)?;

    Ok(model)
}
