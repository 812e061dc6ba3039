//! recsys - item-based collaborative filtering over a JSON rating dataset

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use recsys_core::config::{load_dotenv, ConfigLoader, EngineConfig};
use recsys_core::{init_logging, LogConfig, LogFormat};
use recsys_itemcf::{report, ItemBasedRecommender, RatingDataset};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "recsys")]
#[command(about = "Item-based collaborative filtering over a rating dataset", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        global = true,
        env = "RECSYS_DATASET",
        help = "Path to a JSON rating dataset"
    )]
    dataset: Option<PathBuf>,

    #[arg(long, global = true, help = "Log format: pretty or json")]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the item-item cosine similarity matrix")]
    Similarity {
        #[arg(short, long, help = "Also save the matrix as CSV to this path")]
        output: Option<PathBuf>,
    },

    #[command(about = "Recommend unrated items for a user")]
    Recommend {
        #[arg(short, long, help = "User name or row index")]
        user: String,

        #[arg(short = 'k', long, help = "Number of items to recommend")]
        top_k: Option<usize>,
    },

    #[command(about = "Show the most similar pair of items")]
    SimilarPair {
        #[arg(long, help = "Similarity at or above which a pair counts as a duplicate")]
        ceiling: Option<f64>,
    },

    #[command(about = "List the items most similar to one item")]
    Neighbours {
        #[arg(short, long, help = "Item title or column index")]
        item: String,

        #[arg(short, default_value = "3", help = "Number of neighbours")]
        k: usize,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    load_dotenv();

    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    log_config.validate()?;
    init_logging(&log_config)?;

    let mut config = EngineConfig::from_env()?;
    if cli.dataset.is_some() {
        config.dataset = cli.dataset.clone();
    }
    config.validate()?;

    let path = config
        .dataset
        .clone()
        .context("RECSYS_DATASET must be set either as environment variable or --dataset flag")?;

    let matrix = RatingDataset::load(&path)?
        .into_matrix()
        .with_context(|| format!("Dataset {} is not a valid rating matrix", path.display()))?;
    let recommender = ItemBasedRecommender::fit(matrix)?;

    info!(
        users = recommender.matrix().num_users(),
        items = recommender.matrix().num_items(),
        "Item similarity ready"
    );

    match cli.command {
        Commands::Similarity { output } => {
            print!(
                "{}",
                report::render_similarity(recommender.matrix(), recommender.similarity())
            );
            if let Some(path) = output {
                report::write_similarity_csv(recommender.matrix(), recommender.similarity(), &path)?;
                println!("\n{} {}", "Saved similarity matrix to".green(), path.display());
            }
        }
        Commands::Recommend { user, top_k } => {
            let top_k = NonZeroUsize::new(top_k.unwrap_or(config.top_k))
                .context("--top-k must be at least 1")?;
            let recommendation = recommender.recommend_for(&user, top_k)?;
            print!(
                "{}",
                report::render_recommendation(recommender.matrix(), &recommendation)
            );
        }
        Commands::SimilarPair { ceiling } => {
            let ceiling = ceiling.unwrap_or(config.duplicate_threshold);

            let any = recommender.most_similar_pair(None)?;
            print!(
                "{}",
                report::render_pair(
                    recommender.matrix(),
                    "Most similar pair (including possible duplicates)",
                    any.as_ref()
                )
            );

            let non_duplicate = recommender.most_similar_pair(Some(ceiling))?;
            println!();
            print!(
                "{}",
                report::render_pair(
                    recommender.matrix(),
                    &format!("Most similar non-identical pair (similarity < {})", ceiling),
                    non_duplicate.as_ref()
                )
            );
        }
        Commands::Neighbours { item, k } => {
            let item = recommender.matrix().resolve_item(&item)?;
            let neighbours = recommender.similar_items(item, k)?;
            print!(
                "{}",
                report::render_neighbours(recommender.matrix(), item, &neighbours)
            );
        }
    }

    Ok(())
}
