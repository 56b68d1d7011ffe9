use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// Loaded once in `main` and passed into each component at construction.
/// Nothing outside this type reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the batch object store.
    pub data_dir: PathBuf,

    /// Table (directory) name for the primary post store.
    pub posts_table: String,

    /// Table (directory) name for the key-phrase store.
    pub keyphrase_table: String,

    /// Source tag baked into batch object keys.
    pub source: String,

    /// Listing scope for the fetcher: a subreddit name, or empty for the
    /// front page.
    pub scope: String,

    /// Maximum posts captured per fetch invocation.
    pub fetch_limit: u32,

    /// User agent sent to the content source API.
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(required_env("PULSEBOARD_DATA_DIR")),
            posts_table: env::var("PULSEBOARD_POSTS_TABLE")
                .unwrap_or_else(|_| "reddit_posts".to_string()),
            keyphrase_table: env::var("PULSEBOARD_KEYPHRASE_TABLE")
                .unwrap_or_else(|_| "keyphrase_identification".to_string()),
            source: env::var("PULSEBOARD_SOURCE")
                .unwrap_or_else(|_| crate::keys::DEFAULT_SOURCE.to_string()),
            scope: env::var("PULSEBOARD_SCOPE").unwrap_or_default(),
            fetch_limit: env::var("PULSEBOARD_FETCH_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("PULSEBOARD_FETCH_LIMIT must be a number"),
            user_agent: env::var("PULSEBOARD_USER_AGENT")
                .unwrap_or_else(|_| "pulseboard/0.1".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
