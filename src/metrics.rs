use chrono::{DateTime, Utc};

use crate::types::{ChannelMetrics, PostRecord};

/// Compute engagement figures from the retained posts.
///
/// Mirrors the metrics shown alongside a channel in the dashboard that
/// consumes this output: average views per post, engagement rate as a
/// percentage of subscribers, and posting frequency in posts per day over
/// the span of the retained posts. A span of zero days (all posts from
/// today) reports the raw post count as the frequency.
pub fn channel_metrics(
    subscriber_count: u64,
    posts: &[PostRecord],
    now: DateTime<Utc>,
) -> ChannelMetrics {
    if posts.is_empty() {
        return ChannelMetrics {
            avg_views: 0,
            engagement_rate: 0.0,
            post_frequency: 0.0,
        };
    }

    let total_views: u64 = posts.iter().map(|p| p.views).sum();
    let avg_views = total_views / posts.len() as u64;

    let engagement_rate = if subscriber_count == 0 {
        0.0
    } else {
        round2(avg_views as f64 / subscriber_count as f64 * 100.0)
    };

    let oldest = posts
        .iter()
        .map(|p| p.posted_at)
        .min()
        .unwrap_or(now);
    let days = (now - oldest).num_days();
    let post_frequency = if days <= 0 {
        posts.len() as f64
    } else {
        round2(posts.len() as f64 / days as f64)
    };

    ChannelMetrics {
        avg_views,
        engagement_rate,
        post_frequency,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(views: u64, age_days: i64, now: DateTime<Utc>) -> PostRecord {
        PostRecord {
            telegram_message_id: 1,
            text: String::new(),
            views,
            forwards: 0,
            replies: 0,
            posted_at: now - Duration::days(age_days),
            has_media: false,
        }
    }

    #[test]
    fn empty_posts_yield_zeroes() {
        let m = channel_metrics(1000, &[], Utc::now());
        assert_eq!(m.avg_views, 0);
        assert_eq!(m.engagement_rate, 0.0);
        assert_eq!(m.post_frequency, 0.0);
    }

    #[test]
    fn averages_views_and_rates() {
        let now = Utc::now();
        let posts = vec![post(100, 0, now), post(300, 10, now)];
        let m = channel_metrics(1000, &posts, now);
        assert_eq!(m.avg_views, 200);
        assert_eq!(m.engagement_rate, 20.0);
        assert_eq!(m.post_frequency, 0.2);
    }

    #[test]
    fn zero_subscribers_means_zero_engagement() {
        let now = Utc::now();
        let posts = vec![post(500, 5, now)];
        let m = channel_metrics(0, &posts, now);
        assert_eq!(m.engagement_rate, 0.0);
    }

    #[test]
    fn same_day_span_uses_post_count() {
        let now = Utc::now();
        let posts = vec![post(10, 0, now), post(20, 0, now), post(30, 0, now)];
        let m = channel_metrics(100, &posts, now);
        assert_eq!(m.post_frequency, 3.0);
    }

    #[test]
    fn rate_rounds_to_two_decimals() {
        let now = Utc::now();
        let posts = vec![post(1, 3, now), post(2, 6, now), post(2, 9, now)];
        // avg_views = 1 (integer mean of 5/3), 1/1200*100 = 0.0833..
        let m = channel_metrics(1200, &posts, now);
        assert_eq!(m.engagement_rate, 0.08);
        assert_eq!(m.post_frequency, 0.33);
    }
}
