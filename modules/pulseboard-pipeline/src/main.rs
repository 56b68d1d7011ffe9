use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pulseboard_analysis::{LexiconScorer, TitleAnalyzer};
use pulseboard_common::Config;
use pulseboard_pipeline::{Fetcher, PublishStage, RedditSource, SentimentStage};
use pulseboard_store::{FsKeyPhraseStore, FsObjectStore, FsPostStore, ObjectStore};
use reddit_client::RedditClient;

#[derive(Parser)]
#[command(name = "pulseboard", about = "Reddit sentiment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a raw batch from the content source
    Fetch,
    /// Score unprocessed raw batches
    Score,
    /// Publish scored batches to the durable stores
    Publish,
    /// Run fetch, score and publish in order
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pulseboard_pipeline=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    // Batch objects and table rows live in sibling trees so a table row
    // can never surface in a batch listing.
    let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(config.data_dir.join("objects")));

    match cli.command {
        Command::Fetch => {
            let report = fetcher(&config, store).run().await?;
            println!("{report}");
        }
        Command::Score => {
            let report = sentiment_stage(&config, store).run().await?;
            println!("{report}");
        }
        Command::Publish => {
            let report = publish_stage(&config, store).run().await?;
            println!("{report}");
        }
        Command::All => {
            let report = fetcher(&config, store.clone()).run().await?;
            println!("{report}");
            let report = sentiment_stage(&config, store.clone()).run().await?;
            println!("{report}");
            let report = publish_stage(&config, store).run().await?;
            println!("{report}");
        }
    }

    Ok(())
}

fn fetcher(config: &Config, store: Arc<dyn ObjectStore>) -> Fetcher {
    let source = RedditSource::new(RedditClient::new(config.user_agent.clone()));
    Fetcher::new(
        Box::new(source),
        store,
        config.source.clone(),
        config.scope.clone(),
        config.fetch_limit,
    )
}

fn sentiment_stage(config: &Config, store: Arc<dyn ObjectStore>) -> SentimentStage {
    SentimentStage::new(store, Arc::new(LexiconScorer::new()), config.source.clone())
}

fn publish_stage(config: &Config, store: Arc<dyn ObjectStore>) -> PublishStage {
    let tables = config.data_dir.join("tables");
    PublishStage::new(
        store,
        Arc::new(FsPostStore::new(tables.join(&config.posts_table))),
        Arc::new(FsKeyPhraseStore::new(tables.join(&config.keyphrase_table))),
        Arc::new(TitleAnalyzer::new()),
    )
}
