use std::time::Instant;

use chrono::Utc;

use crate::config::Settings;
use crate::metrics::channel_metrics;
use crate::services::log::ActivityLogger;
use crate::services::telegram::{normalize_identifier, ChannelFetcher};
use crate::types::FetchReport;

// Helper functions for logging - ignore errors to not break the fetch
fn log_info(username: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = ActivityLogger::new() {
        let _ = logger.info(username, event, details);
    }
}

fn log_error(username: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = ActivityLogger::new() {
        let _ = logger.error(username, event, details);
    }
}

/* ------------ public facade ------------ */

/// Connect, fetch one channel, disconnect, and fold every failure into the
/// report so the caller always has exactly one document to print.
///
/// `disconnect` runs on every path where `connect` succeeded, whether the
/// fetch itself succeeded or not. No retries, no partial results: a failure
/// during post enumeration discards anything already collected.
pub async fn fetch_channel(settings: &Settings, identifier: &str) -> FetchReport {
    let start_time = Instant::now();
    let handle = normalize_identifier(identifier);

    let fetcher = match ChannelFetcher::connect(settings).await {
        Ok(fetcher) => fetcher,
        Err(e) => {
            let details = format!("connect failed in {}ms", start_time.elapsed().as_millis());
            log_error(Some(handle), "fetch_channel", Some(&details));
            return FetchReport::err(e.to_string());
        }
    };

    let report = match fetcher.fetch(identifier).await {
        Ok((channel, posts)) => {
            let metrics = channel_metrics(channel.subscriber_count, &posts, Utc::now());
            FetchReport::ok(channel, posts, metrics)
        }
        Err(e) => FetchReport::err(e.to_string()),
    };

    if let Err(e) = fetcher.disconnect().await {
        log_error(Some(handle), "disconnect", Some(&e.to_string()));
    }

    let duration = start_time.elapsed();
    if report.success {
        let details = format!("succeeded in {}ms", duration.as_millis());
        log_info(Some(handle), "fetch_channel", Some(&details));
    } else {
        let details = format!("failed in {}ms", duration.as_millis());
        log_error(Some(handle), "fetch_channel", Some(&details));
    }

    report
}
