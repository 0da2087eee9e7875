//! Podcast feed retrieval and episode selection.
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::time::Duration;

/// Titles matching this pattern are skipped when picking the newest episode.
pub const DEFAULT_SKIP_TITLE_PATTERN: &str = "(?i)^teaser";

/// Give up after skipping this many episodes in a row.
const MAX_SKIPPED_EPISODES: usize = 5;

/// One feed item with the fields the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    pub guid: Option<String>,
    pub audio_url: Option<String>,
}

/// Parsed feed: channel title plus items in document order.
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub language: Option<String>,
    pub episodes: Vec<Episode>,
}

impl Feed {
    pub fn parse(text: &str) -> Result<Self> {
        let channel = rss::Channel::read_from(text.as_bytes()).context("parse RSS feed")?;
        let episodes = channel
            .items()
            .iter()
            .map(|item| Episode {
                title: item.title().unwrap_or_default().to_string(),
                guid: item.guid().map(|guid| guid.value().to_string()),
                audio_url: item.enclosure().map(|enclosure| enclosure.url().to_string()),
            })
            .collect();
        Ok(Self {
            title: channel.title().to_string(),
            language: channel.language().map(str::to_string),
            episodes,
        })
    }
}

/// HTTP client for a single feed URL.
pub struct FeedClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl FeedClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            user_agent: user_agent.to_string(),
        }
    }

    pub fn fetch(&self, url: &str) -> Result<Feed> {
        tracing::info!(url, "downloading feed");
        let text = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .with_context(|| format!("GET {url}"))?
            .body_mut()
            .read_to_string()
            .with_context(|| format!("read feed body from {url}"))?;
        let feed = Feed::parse(&text)?;
        tracing::info!(
            title = %feed.title,
            language = feed.language.as_deref().unwrap_or("unknown"),
            episodes = feed.episodes.len(),
            "feed parsed"
        );
        Ok(feed)
    }

    pub fn agent(&self) -> &ureq::Agent {
        &self.agent
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Pick the newest episode whose title does not match `skip`.
///
/// Feeds are assumed to list episodes oldest first, so the search walks
/// backwards from the last item.
pub fn select_latest_episode<'a>(episodes: &'a [Episode], skip: &Regex) -> Result<&'a Episode> {
    if episodes.is_empty() {
        return Err(anyhow!("feed has no episodes"));
    }
    for (skipped, episode) in episodes.iter().rev().enumerate() {
        if !skip.is_match(&episode.title) {
            return Ok(episode);
        }
        tracing::debug!(title = %episode.title, "skipping episode");
        if skipped + 1 >= MAX_SKIPPED_EPISODES {
            break;
        }
    }
    Err(anyhow!(
        "no episode outside {skip} among the newest {}",
        MAX_SKIPPED_EPISODES.min(episodes.len())
    ))
}

/// Return the enclosure URL for `episode`.
pub fn episode_audio_url(episode: &Episode) -> Result<&str> {
    episode
        .audio_url
        .as_deref()
        .ok_or_else(|| anyhow!("episode {:?} has no audio enclosure", episode.title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(title: &str) -> Episode {
        Episode {
            title: title.to_string(),
            guid: None,
            audio_url: Some(format!("https://cdn.example/{title}.mp3")),
        }
    }

    fn skip() -> Regex {
        Regex::new(DEFAULT_SKIP_TITLE_PATTERN).expect("pattern")
    }

    #[test]
    fn picks_last_non_teaser_episode() {
        let episodes = vec![
            episode("Episode 1"),
            episode("Episode 2"),
            episode("TEASER: Episode 3"),
            episode("teaser for 3"),
        ];
        let latest = select_latest_episode(&episodes, &skip()).expect("episode");
        assert_eq!(latest.title, "Episode 2");
    }

    #[test]
    fn gives_up_after_five_skipped_episodes() {
        let mut episodes = vec![episode("Episode 1")];
        episodes.extend((0..5).map(|index| episode(&format!("Teaser {index}"))));
        let err = select_latest_episode(&episodes, &skip()).expect_err("too many teasers");
        assert!(err.to_string().contains("newest 5"), "{err}");

        episodes.pop();
        let latest = select_latest_episode(&episodes, &skip()).expect("episode");
        assert_eq!(latest.title, "Episode 1");
    }

    #[test]
    fn empty_feed_is_an_error() {
        assert!(select_latest_episode(&[], &skip()).is_err());
    }

    #[test]
    fn parses_channel_and_enclosures() {
        let feed = Feed::parse(
            r#"<?xml version="1.0"?>
            <rss version="2.0">
              <channel>
                <title>Podcast About List</title>
                <link>https://example.com</link>
                <description>A show</description>
                <language>en-us</language>
                <item>
                  <title>Episode 1</title>
                  <guid>ep-1</guid>
                  <enclosure url="https://cdn.example/ep1.mp3" length="1" type="audio/mpeg"/>
                </item>
                <item>
                  <title>Bonus</title>
                </item>
              </channel>
            </rss>"#,
        )
        .expect("parse feed");

        assert_eq!(feed.title, "Podcast About List");
        assert_eq!(feed.language.as_deref(), Some("en-us"));
        assert_eq!(feed.episodes.len(), 2);
        assert_eq!(feed.episodes[0].guid.as_deref(), Some("ep-1"));
        assert_eq!(
            episode_audio_url(&feed.episodes[0]).expect("url"),
            "https://cdn.example/ep1.mp3"
        );
        assert!(episode_audio_url(&feed.episodes[1]).is_err());
    }
}
