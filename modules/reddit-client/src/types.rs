use serde::Deserialize;

/// Top-level envelope of a listing endpoint response.
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

/// One entry in a listing. `kind` is `"t3"` for link/self posts; other
/// kinds (comments, subreddits) show up in some listings and are skipped.
#[derive(Debug, Deserialize)]
pub struct ListingChild {
    pub kind: String,
    pub data: ListingPost,
}

/// The post payload inside a listing child. Only the fields the pipeline
/// projects are modeled; everything else in the response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub subreddit: Option<String>,
}
