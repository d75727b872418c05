use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use grammers_client::types::Chat;
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::Session;
use grammers_tl_types as tl;

use crate::config::Settings;
use crate::error::{Result, TgFetchError};
use crate::types::{ChannelRecord, PostRecord};

/// Hard cap on the number of posts returned per fetch.
pub const POST_LIMIT: usize = 30;
/// Posts older than this many days are dropped.
pub const WINDOW_DAYS: i64 = 60;

/// One authenticated Telegram session wrapped around a single fetch.
///
/// `connect` acquires the session, `fetch` performs the sequential remote
/// calls, `disconnect` saves the session and releases the connection. The
/// caller (see `api::fetch_channel`) guarantees `disconnect` runs on every
/// path where `connect` succeeded.
pub struct ChannelFetcher {
    client: Client,
    session_path: PathBuf,
}

impl ChannelFetcher {
    /// Establish an authenticated session from the configured credentials.
    ///
    /// First use performs an interactive login (phone, code, optional 2FA
    /// password) with prompts on stderr so stdout stays a pure JSON stream;
    /// later runs reuse the saved session file.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let session = Session::load_file_or_create(&settings.session_path)?;
        let client = Client::connect(Config {
            session,
            api_id: settings.api_id,
            api_hash: settings.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(TgFetchError::telegram)?;

        if !client.is_authorized().await.map_err(TgFetchError::telegram)? {
            sign_in_interactive(&client).await?;
        }
        client.session().save_to_file(&settings.session_path)?;

        Ok(Self {
            client,
            session_path: settings.session_path.clone(),
        })
    }

    /// Resolve `identifier` to a broadcast channel and collect its metadata
    /// plus recent posts.
    pub async fn fetch(&self, identifier: &str) -> Result<(ChannelRecord, Vec<PostRecord>)> {
        let handle = normalize_identifier(identifier);

        let chat = self
            .client
            .resolve_username(handle)
            .await
            .map_err(TgFetchError::telegram)?
            .ok_or_else(|| TgFetchError::UnresolvedUsername(handle.to_string()))?;

        let channel = match chat {
            Chat::Channel(channel) => channel,
            _ => return Err(TgFetchError::NotAChannel),
        };

        let full = self.full_channel(&channel).await?;
        let record = channel_record(&channel.raw, &full);
        let posts = self.recent_posts(&channel).await?;

        Ok((record, posts))
    }

    /// Save the session and drop the connection.
    pub async fn disconnect(self) -> Result<()> {
        self.client.session().save_to_file(&self.session_path)?;
        drop(self.client);
        Ok(())
    }

    /// Second remote call: extended metadata (about text, participant count).
    async fn full_channel(
        &self,
        channel: &grammers_client::types::chat::Channel,
    ) -> Result<tl::types::ChannelFull> {
        let input = tl::types::InputChannel {
            channel_id: channel.raw.id,
            access_hash: channel.raw.access_hash.unwrap_or(0),
        };
        let tl::enums::messages::ChatFull::Full(full) = self
            .client
            .invoke(&tl::functions::channels::GetFullChannel {
                channel: input.into(),
            })
            .await
            .map_err(TgFetchError::telegram)?;

        match full.full_chat {
            tl::enums::ChatFull::ChannelFull(full) => Ok(full),
            tl::enums::ChatFull::Full(_) => Err(TgFetchError::NotAChannel),
        }
    }

    /// Enumerate messages newest-first, stopping at `POST_LIMIT` or the
    /// first message older than the window. The window is re-checked with
    /// an explicit filter afterwards so the result does not depend on the
    /// feed being strictly ordered.
    async fn recent_posts(
        &self,
        channel: &grammers_client::types::chat::Channel,
    ) -> Result<Vec<PostRecord>> {
        let cutoff = Utc::now() - Duration::days(WINDOW_DAYS);
        let mut iter = self.client.iter_messages(channel.pack()).limit(POST_LIMIT);

        let mut posts = Vec::new();
        while let Some(message) = iter.next().await.map_err(TgFetchError::telegram)? {
            if message.date() < cutoff {
                break;
            }
            posts.push(post_record(&message));
        }

        Ok(retain_recent(posts, cutoff))
    }
}

/// Trim surrounding whitespace and any leading `@`s from a raw identifier.
pub fn normalize_identifier(raw: &str) -> &str {
    raw.trim().trim_start_matches('@')
}

/// Keep only posts dated at or after `cutoff`, newest first, capped at
/// `POST_LIMIT`. Belt-and-braces over the early-stop during enumeration.
pub fn retain_recent(posts: Vec<PostRecord>, cutoff: DateTime<Utc>) -> Vec<PostRecord> {
    let mut recent: Vec<PostRecord> = posts.into_iter().filter(|p| p.posted_at >= cutoff).collect();
    recent.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    recent.truncate(POST_LIMIT);
    recent
}

fn channel_record(raw: &tl::types::Channel, full: &tl::types::ChannelFull) -> ChannelRecord {
    ChannelRecord {
        telegram_id: raw.id.to_string(),
        username: raw.username.as_ref().map(|u| format!("@{u}")),
        title: raw.title.clone(),
        description: full.about.clone(),
        subscriber_count: full.participants_count.unwrap_or(0).max(0) as u64,
        verified: raw.verified,
        scam: raw.scam,
        restricted: raw.restricted,
        created_at: DateTime::from_timestamp(i64::from(raw.date), 0),
    }
}

fn post_record(message: &grammers_client::types::Message) -> PostRecord {
    let raw = &message.raw;
    let replies = raw
        .replies
        .as_ref()
        .map(|r| {
            let tl::enums::MessageReplies::Replies(inner) = r;
            inner.replies
        })
        .unwrap_or(0);

    PostRecord {
        telegram_message_id: message.id(),
        text: message.text().to_string(),
        views: raw.views.unwrap_or(0).max(0) as u64,
        forwards: raw.forwards.unwrap_or(0).max(0) as u64,
        replies: replies.max(0) as u64,
        posted_at: message.date(),
        has_media: raw.media.is_some(),
    }
}

/// Phone + login code (+ optional password) flow for a fresh session.
async fn sign_in_interactive(client: &Client) -> Result<()> {
    let phone = prompt("Phone number (international format): ")?;
    let token = client
        .request_login_code(phone.trim())
        .await
        .map_err(TgFetchError::telegram)?;

    let code = prompt("Login code: ")?;
    match client.sign_in(&token, code.trim()).await {
        Ok(_) => Ok(()),
        Err(SignInError::PasswordRequired(password_token)) => {
            let password = prompt("Two-factor password: ")?;
            client
                .check_password(password_token, password.trim())
                .await
                .map_err(TgFetchError::telegram)?;
            Ok(())
        }
        Err(e) => Err(TgFetchError::telegram(e)),
    }
}

/// Prompt on stderr; stdout is reserved for the JSON document.
fn prompt(text: &str) -> Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(text.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_at(id: i32, posted_at: DateTime<Utc>) -> PostRecord {
        PostRecord {
            telegram_message_id: id,
            text: String::new(),
            views: 0,
            forwards: 0,
            replies: 0,
            posted_at,
            has_media: false,
        }
    }

    #[test]
    fn normalize_strips_at_and_whitespace() {
        assert_eq!(normalize_identifier("@examplechannel"), "examplechannel");
        assert_eq!(normalize_identifier("  @@handle \n"), "handle");
        assert_eq!(normalize_identifier("plain"), "plain");
    }

    #[test]
    fn retain_recent_drops_old_posts_even_out_of_order() {
        let now = Utc::now();
        let cutoff = now - Duration::days(WINDOW_DAYS);
        let posts = vec![
            post_at(1, now - Duration::days(1)),
            post_at(2, now - Duration::days(90)), // stale post in the middle
            post_at(3, now - Duration::days(2)),
        ];
        let kept = retain_recent(posts, cutoff);
        assert_eq!(
            kept.iter().map(|p| p.telegram_message_id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn retain_recent_caps_at_post_limit() {
        let now = Utc::now();
        let cutoff = now - Duration::days(WINDOW_DAYS);
        let posts: Vec<_> = (0..50)
            .map(|i| post_at(i, now - Duration::hours(i as i64)))
            .collect();
        let kept = retain_recent(posts, cutoff);
        assert_eq!(kept.len(), POST_LIMIT);
        // newest first
        assert_eq!(kept[0].telegram_message_id, 0);
    }

    #[test]
    fn retain_recent_orders_newest_first() {
        let now = Utc::now();
        let cutoff = now - Duration::days(WINDOW_DAYS);
        let posts = vec![
            post_at(1, now - Duration::days(5)),
            post_at(2, now - Duration::days(1)),
            post_at(3, now - Duration::days(3)),
        ];
        let kept = retain_recent(posts, cutoff);
        assert_eq!(
            kept.iter().map(|p| p.telegram_message_id).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn boundary_post_exactly_at_cutoff_is_kept() {
        let now = Utc::now();
        let cutoff = now - Duration::days(WINDOW_DAYS);
        let kept = retain_recent(vec![post_at(7, cutoff)], cutoff);
        assert_eq!(kept.len(), 1);
    }
}
