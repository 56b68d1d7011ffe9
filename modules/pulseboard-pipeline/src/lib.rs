pub mod discovery;
pub mod fetcher;
pub mod publish;
pub mod sentiment;

pub use discovery::{Discovery, DiscoveredWork};
pub use fetcher::{ContentSource, FetchReport, Fetcher, RedditSource};
pub use publish::{PublishReport, PublishStage};
pub use sentiment::{ScoreReport, SentimentStage};
