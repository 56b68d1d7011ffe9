pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{ListingChild, ListingData, ListingPost, ListingResponse};

const BASE_URL: &str = "https://www.reddit.com";

/// Listing child kind for link/self posts.
const KIND_POST: &str = "t3";

pub struct RedditClient {
    client: reqwest::Client,
    user_agent: String,
}

impl RedditClient {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: user_agent.into(),
        }
    }

    /// Fetch up to `limit` posts from the hot listing.
    ///
    /// `scope` selects a subreddit; pass an empty scope for the front page.
    pub async fn fetch_hot(&self, scope: &str, limit: u32) -> Result<Vec<ListingPost>> {
        let url = if scope.is_empty() {
            format!("{}/hot.json?limit={}", BASE_URL, limit)
        } else {
            format!("{}/r/{}/hot.json?limit={}", BASE_URL, scope, limit)
        };

        tracing::info!(scope, limit, "Fetching hot listing");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let listing: ListingResponse = resp.json().await?;

        let posts: Vec<ListingPost> = listing
            .data
            .children
            .into_iter()
            .filter(|c| c.kind == KIND_POST)
            .map(|c| c.data)
            .take(limit as usize)
            .collect();

        tracing::info!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }
}
