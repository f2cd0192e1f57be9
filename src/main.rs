//! fashionNet dataset CLI
//!
//! Inspect the indexed subsets, preprocess single items and build Burn
//! batches from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::data::dataloader::batcher::Batcher;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};

use fashionnet_fewshot::backend::{backend_name, default_device, DefaultBackend};
use fashionnet_fewshot::utils::logging::{init_logging, LogConfig};
use fashionnet_fewshot::{
    load_toml_config, DataConfig, FashionNetBatcher, FashionNetDataset, FashionNetItem, VERSION,
};

/// fashionNet few-shot dataset tools
#[derive(Parser, Debug)]
#[command(name = "fashionnet")]
#[command(version = VERSION)]
#[command(about = "Index and preprocess the fashionNet few-shot dataset", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, default_value = "false", conflicts_with = "verbose")]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// TOML file with data settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root data directory containing fashionNet/ (overrides the config file)
    #[arg(short, long)]
    data_path: Option<PathBuf>,

    /// Fail if the subset directory does not exist
    #[arg(long, default_value = "false")]
    strict: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a subset and show per-class statistics
    Index {
        /// Subset to index (background or evaluation)
        #[arg(short, long, default_value = "background")]
        subset: String,

        /// Print statistics as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Load and preprocess a single item
    Item {
        /// Subset to index (background or evaluation)
        #[arg(short, long, default_value = "background")]
        subset: String,

        /// Row id of the item
        #[arg(short, long)]
        index: usize,
    },

    /// Batch the first items of a subset on the default backend
    Batch {
        /// Subset to index (background or evaluation)
        #[arg(short, long, default_value = "background")]
        subset: String,

        /// Number of items in the batch
        #[arg(short = 'n', long, default_value = "16")]
        size: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_flags(cli.verbose, cli.quiet, cli.log_level.as_deref());

    let _ = init_logging(&log_config);
    debug!("fashionnet {} (log level {})", VERSION, log_config.level);

    let mut config = match &cli.config {
        Some(path) => load_toml_config::<DataConfig>(path)?,
        None => DataConfig::default(),
    };
    if let Some(data_path) = cli.data_path {
        config.data_path = data_path;
    }
    if cli.strict {
        config.strict = true;
    }

    match cli.command {
        Commands::Index { subset, json } => cmd_index(&config, &subset, json),
        Commands::Item { subset, index } => cmd_item(&config, &subset, index),
        Commands::Batch { subset, size } => cmd_batch(&config, &subset, size),
    }
}

fn cmd_index(config: &DataConfig, subset: &str, json: bool) -> Result<()> {
    let config = DataConfig {
        show_progress: config.show_progress && !json,
        ..config.clone()
    };
    let dataset = FashionNetDataset::from_subset_name(&config, subset)
        .with_context(|| format!("Failed to index subset '{}'", subset))?;
    let stats = dataset.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if dataset.is_empty() {
        println!(
            "{} No images found under {:?}",
            "Warning:".yellow(),
            config.subset_root(dataset.subset())
        );
    }

    stats.print();

    Ok(())
}

fn cmd_item(config: &DataConfig, subset: &str, index: usize) -> Result<()> {
    let dataset = FashionNetDataset::from_subset_name(config, subset)
        .with_context(|| format!("Failed to index subset '{}'", subset))?;

    let (image, class_id) = dataset
        .item(index)
        .with_context(|| format!("Failed to load item {}", index))?;
    let class_name = dataset
        .class_registry()
        .name(class_id)
        .unwrap_or("<unknown>");

    println!("{}", format!("Item {}", index).cyan().bold());
    if let Some(path) = dataset.filepath(index) {
        println!("  Path:   {}", path.display());
    }
    println!("  Label:  {} ({})", class_id, class_name.green());
    println!("  Shape:  {:?}", image.shape());
    if let Some((lo, hi)) = image.min_max() {
        println!("  Range:  [{:.4}, {:.4}]", lo, hi);
    }

    Ok(())
}

fn cmd_batch(config: &DataConfig, subset: &str, size: usize) -> Result<()> {
    let dataset = FashionNetDataset::from_subset_name(config, subset)
        .with_context(|| format!("Failed to index subset '{}'", subset))?;

    let items = (0..size.min(dataset.len()))
        .map(|i| {
            let (tensor, label) = dataset
                .item(i)
                .with_context(|| format!("Failed to load item {}", i))?;
            let path = dataset
                .filepath(i)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok(FashionNetItem::new(tensor, label, path))
        })
        .collect::<Result<Vec<_>>>()?;

    if items.is_empty() {
        println!("{} Nothing to batch", "Warning:".yellow());
        return Ok(());
    }

    info!("Batching {} items on {}", items.len(), backend_name());
    let batcher = FashionNetBatcher::<DefaultBackend>::new(default_device());
    let batch = batcher.batch(items);

    println!("{}", "Batch:".cyan().bold());
    println!("  Backend: {}", backend_name());
    println!("  Images:  {:?}", batch.images.dims());
    println!("  Targets: {:?}", batch.targets.dims());

    Ok(())
}
