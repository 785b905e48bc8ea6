use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::SocialSignalProvider;
use crate::error::ProviderError;

const DEFAULT_POSTS: [&str; 10] = [
    "The air feels heavy today, hard to breathe.",
    "Beautiful sunny day! Perfect for a walk.",
    "Is it just me or is the pollution getting worse in downtown?",
    "Love the new environmental monitoring app, so helpful.",
    "Stuck in traffic, the smog is unbearable.",
    "Water quality in the local park seems much better now.",
    "Warning: High UV levels today, stay hydrated!",
    "Feeling stressed about the recent heatwaves.",
    "Great community effort on the recycling drive.",
    "The city needs more green spaces.",
];

pub fn default_feed() -> Vec<String> {
    DEFAULT_POSTS.iter().map(|post| post.to_string()).collect()
}

#[derive(Debug, Clone)]
struct FeedPost {
    text: String,
    location: Option<String>,
}

/// Synthetic community feed. Read-only once built.
#[derive(Debug, Clone)]
pub struct MockSocialFeed {
    posts: Vec<FeedPost>,
}

impl MockSocialFeed {
    pub fn new() -> Self {
        Self::from_posts(default_feed())
    }

    pub fn from_posts(posts: Vec<String>) -> Self {
        Self {
            posts: posts
                .into_iter()
                .map(|text| FeedPost {
                    text,
                    location: None,
                })
                .collect(),
        }
    }

    pub fn from_csv(csv_path: &Path) -> Result<Self, ProviderError> {
        let file = std::fs::File::open(csv_path).map_err(|err| {
            ProviderError::Unavailable(format!("cannot open {}: {err}", csv_path.display()))
        })?;
        Self::from_reader(file)
    }

    /// Expects a `text` column and an optional `location` column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProviderError> {
        #[derive(serde::Deserialize)]
        struct CsvRow {
            text: String,
            location: Option<String>,
        }

        let mut reader = csv::Reader::from_reader(reader);
        let mut posts = Vec::new();

        for result in reader.deserialize::<CsvRow>() {
            let row = result?;
            let text = row.text.trim();
            if text.is_empty() {
                continue;
            }
            posts.push(FeedPost {
                text: text.to_string(),
                location: row
                    .location
                    .map(|location| location.trim().to_string())
                    .filter(|location| !location.is_empty()),
            });
        }

        if posts.is_empty() {
            debug!("social corpus was empty, using the built-in feed");
            return Ok(Self::new());
        }

        Ok(Self { posts })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn posts_for(&self, location: &str) -> Vec<String> {
        self.posts
            .iter()
            .filter(|post| match &post.location {
                Some(tagged) => tagged.eq_ignore_ascii_case(location),
                None => true,
            })
            .map(|post| post.text.clone())
            .collect()
    }
}

impl Default for MockSocialFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialSignalProvider for MockSocialFeed {
    async fn fetch_posts(&self, location: &str) -> Result<Vec<String>, ProviderError> {
        let posts = self.posts_for(location);
        if posts.is_empty() {
            debug!(%location, "no posts for location, using the built-in feed");
            return Ok(default_feed());
        }
        Ok(posts)
    }
}
