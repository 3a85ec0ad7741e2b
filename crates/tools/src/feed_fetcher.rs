//! Feed fetcher: podcast directory search plus RSS lookup.
//!
//! Given a show name, searches the podcast directory, follows the first
//! hit's feed URL and reports the show's metadata together with its newest
//! episode. A search with no usable hit is not an error; the tool returns
//! JSON `null` so the model can try another name.

use async_trait::async_trait;
use castwise_core::error::ToolError;
use castwise_core::tool::{Tool, ToolParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub struct FeedFetcherTool {
    client: reqwest::Client,
    search_url: String,
}

impl FeedFetcherTool {
    pub fn new(client: reqwest::Client, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
        }
    }

    async fn find_feed_url(&self, show_name: &str) -> Result<Option<String>, ToolError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("entity", "podcast"), ("term", show_name)])
            .send()
            .await
            .map_err(|e| ToolError::Network(format!("Podcast search failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Upstream {
                status_code: status.as_u16(),
                message: "Podcast search failed".into(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: "feedFetcher".into(),
                reason: format!("Unreadable search response: {e}"),
            }
        })?;

        Ok(first_feed_url(body))
    }

    async fn fetch_channel(&self, feed_url: &str) -> Result<rss::Channel, ToolError> {
        let response = self
            .client
            .get(feed_url)
            .send()
            .await
            .map_err(|e| ToolError::Network(format!("Failed to fetch feed {feed_url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Upstream {
                status_code: status.as_u16(),
                message: format!("Failed to fetch feed {feed_url}"),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ToolError::Network(format!("Failed to read feed {feed_url}: {e}")))?;

        rss::Channel::read_from(&bytes[..]).map_err(|e| ToolError::ExecutionFailed {
            tool_name: "feedFetcher".into(),
            reason: format!("Error parsing RSS feed: {e}"),
        })
    }
}

#[async_trait]
impl Tool for FeedFetcherTool {
    fn name(&self) -> &str {
        "FeedFetcher"
    }

    fn description(&self) -> &str {
        "Given a show name, returns RSS feed & episode metadata."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "showName": {
                    "type": "string",
                    "description": "The name or search term of the podcast show to search for."
                }
            },
            "required": ["showName"]
        })
    }

    async fn execute(&self, params: ToolParams) -> Result<serde_json::Value, ToolError> {
        let show_name = params
            .get("showName")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'showName' argument".into()))?;

        let Some(feed_url) = self.find_feed_url(show_name).await? else {
            info!(show = %show_name, "No podcast feed found");
            return Ok(serde_json::Value::Null);
        };

        debug!(show = %show_name, feed = %feed_url, "Fetching podcast feed");
        let channel = self.fetch_channel(&feed_url).await?;

        serde_json::to_value(summarize_channel(&channel)).map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: "feedFetcher".into(),
                reason: e.to_string(),
            }
        })
    }
}

/// Show metadata as returned to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastFeed {
    pub title: String,
    pub description: String,
    pub latest_episode: Option<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub title: String,
    pub description: String,
    /// RFC 3339, or `None` when the feed's date was missing or unparseable
    pub pub_date: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "feedUrl")]
    feed_url: Option<String>,
}

fn first_feed_url(response: SearchResponse) -> Option<String> {
    response
        .results
        .into_iter()
        .next()
        .and_then(|hit| hit.feed_url)
        .filter(|url| !url.is_empty())
}

/// Reduce a parsed channel to its metadata and newest episode.
///
/// Episodes are ranked by `pubDate`; undated items rank last. Among equal
/// dates the earliest item in the feed wins.
pub fn summarize_channel(channel: &rss::Channel) -> PodcastFeed {
    let latest = channel
        .items()
        .iter()
        .rev()
        .max_by_key(|item| published_at(item))
        .map(|item| Episode {
            title: item.title().unwrap_or("No Title").to_string(),
            description: item.description().unwrap_or("No Description").to_string(),
            pub_date: published_at(item).map(|d| d.to_rfc3339()),
            audio_url: item.enclosure().map(|e| e.url().to_string()),
        });

    PodcastFeed {
        title: channel.title().to_string(),
        description: channel.description().to_string(),
        latest_episode: latest,
    }
}

fn published_at(item: &rss::Item) -> Option<DateTime<Utc>> {
    item.pub_date()
        .and_then(|raw| DateTime::parse_from_rfc2822(raw.trim()).ok())
        .map(|d| d.with_timezone(&Utc))
}
