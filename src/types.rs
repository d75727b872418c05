use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel metadata merged from the resolved entity and the full-channel
/// request. Built fresh on every invocation, never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub telegram_id: String,
    /// Public handle with its `@` prefix restored, when the channel has one.
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub verified: bool,
    pub scam: bool,
    pub restricted: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// One recent post. Missing counters collapse to zero, missing text to "".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub telegram_message_id: i32,
    pub text: String,
    pub views: u64,
    pub forwards: u64,
    pub replies: u64,
    pub posted_at: DateTime<Utc>,
    pub has_media: bool,
}

/// Engagement figures derived from the retained posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub avg_views: u64,
    /// avg_views / subscriber_count * 100, rounded to 2 decimals.
    pub engagement_rate: f64,
    /// Posts per day over the span of the retained posts.
    pub post_frequency: f64,
}

/// The one JSON document this tool emits, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ChannelMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchReport {
    pub fn ok(channel: ChannelRecord, posts: Vec<PostRecord>, metrics: ChannelMetrics) -> Self {
        Self {
            success: true,
            channel: Some(channel),
            posts: Some(posts),
            metrics: Some(metrics),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            channel: None,
            posts: None,
            metrics: None,
            error: Some(msg.into()),
        }
    }
}
