//! Publication tracking: dedupe against earlier runs and age out old entries.

use chrono::{DateTime, Duration, Utc};

use crate::models::{ArticleRecord, KnownArticle, RetentionConfig, RunState};

/// Decides which scraped articles are worth publishing and maintains the
/// remembered set across runs.
#[derive(Debug, Clone, Copy)]
pub struct StateTracker {
    recent: Duration,
    keep: Duration,
}

impl StateTracker {
    /// Out-of-range windows fall back to the defaults.
    pub fn new(config: &RetentionConfig) -> Self {
        let (recent, keep) = match (config.recent_window(), config.keep_window()) {
            (Some(recent), Some(keep)) => (recent, keep),
            _ => {
                log::warn!(
                    "Warning: retention windows ({}h recent, {}d keep) are out of range; using defaults",
                    config.recent_hours,
                    config.keep_days
                );
                let fallback = RetentionConfig::default();
                (
                    Duration::hours(fallback.recent_hours),
                    Duration::days(fallback.keep_days),
                )
            }
        };
        Self { recent, keep }
    }

    /// True if no earlier run published this URL.
    pub fn is_new(&self, article: &ArticleRecord, state: &RunState) -> bool {
        is_new(article, state)
    }

    /// True if the article falls inside the recency window.
    pub fn is_recent(&self, article: &ArticleRecord, now: DateTime<Utc>) -> bool {
        within(article.published, now, self.recent)
    }

    /// Record this run: stamp `last_run`, remember accepted articles, and
    /// forget anything published before the retention window.
    pub fn merge_and_prune(
        &self,
        state: &mut RunState,
        accepted: &[ArticleRecord],
        now: DateTime<Utc>,
    ) {
        state.last_run = now;

        for article in accepted {
            if !state.contains(&article.url) {
                state.known_articles.push(KnownArticle {
                    url: article.url.clone(),
                    published: article.published,
                });
            }
        }

        let before = state.known_articles.len();
        let keep = self.keep;
        state
            .known_articles
            .retain(|known| within(known.published, now, keep));

        let pruned = before - state.known_articles.len();
        if pruned > 0 {
            log::debug!("Pruned {pruned} known articles older than {keep}");
        }
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new(&RetentionConfig::default())
    }
}

/// True iff no entry in `state` shares the article's URL.
pub fn is_new(article: &ArticleRecord, state: &RunState) -> bool {
    !state.contains(&article.url)
}

/// True iff the article was published within `window_hours` of `now`.
///
/// A window too large to represent covers everything; a negative one covers
/// nothing.
pub fn is_recent(article: &ArticleRecord, now: DateTime<Utc>, window_hours: i64) -> bool {
    match Duration::try_hours(window_hours) {
        Some(window) => within(article.published, now, window),
        None => window_hours > 0,
    }
}

/// `published` is no older than `window` at `now`. A cutoff before the
/// earliest representable instant includes everything.
fn within(published: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now.checked_sub_signed(window)
        .is_none_or(|cutoff| published >= cutoff)
}

/// [`StateTracker::merge_and_prune`] with the default 7-day retention.
pub fn merge_and_prune(state: &mut RunState, accepted: &[ArticleRecord], now: DateTime<Utc>) {
    StateTracker::default().merge_and_prune(state, accepted, now);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, published: DateTime<Utc>) -> ArticleRecord {
        ArticleRecord {
            title: "Title".to_string(),
            url: url.to_string(),
            description: String::new(),
            published,
        }
    }

    fn known(url: &str, published: DateTime<Utc>) -> KnownArticle {
        KnownArticle {
            url: url.to_string(),
            published,
        }
    }

    #[test]
    fn test_is_new_ignores_timestamp() {
        let now = Utc::now();
        let mut state = RunState::empty(now);
        state.known_articles.push(known("https://x/1", now - Duration::days(3)));

        assert!(!is_new(&article("https://x/1", now), &state));
        assert!(is_new(&article("https://x/2", now - Duration::days(3)), &state));
    }

    #[test]
    fn test_is_recent_window() {
        let now = Utc::now();
        assert!(is_recent(&article("a", now - Duration::hours(23)), now, 24));
        assert!(is_recent(&article("a", now - Duration::hours(24)), now, 24));
        assert!(!is_recent(&article("a", now - Duration::hours(25)), now, 24));
        assert!(is_recent(&article("a", now - Duration::days(400)), now, i64::MAX));
        assert!(!is_recent(&article("a", now), now, i64::MIN));

        let tracker = StateTracker::default();
        assert!(tracker.is_recent(&article("a", now), now));
        assert!(!tracker.is_recent(&article("a", now - Duration::days(2)), now));
    }

    #[test]
    fn test_merge_appends_only_unknown_urls() {
        let now = Utc::now();
        let mut state = RunState::empty(now - Duration::days(1));
        state.known_articles.push(known("https://x/1", now - Duration::hours(5)));

        StateTracker::default().merge_and_prune(
            &mut state,
            &[
                article("https://x/1", now),
                article("https://x/2", now),
                article("https://x/2", now),
            ],
            now,
        );

        assert_eq!(state.last_run, now);
        let urls: Vec<_> = state.known_articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/1", "https://x/2"]);
        assert_eq!(state.known_articles[0].published, now - Duration::hours(5));
    }

    #[test]
    fn test_prune_keeps_only_retention_window() {
        let now = Utc::now();
        let mut state = RunState::empty(now - Duration::days(1));
        state.known_articles.push(known("https://x/old", now - Duration::days(10)));
        state.known_articles.push(known("https://x/recent", now - Duration::days(2)));

        merge_and_prune(&mut state, &[], now);

        assert_eq!(state.known_articles.len(), 1);
        assert_eq!(state.known_articles[0].url, "https://x/recent");
    }

    #[test]
    fn test_out_of_range_retention_keeps_fresh_articles() {
        let now = Utc::now();

        for keep_days in [i64::MAX, -1, 0] {
            let tracker = StateTracker::new(&RetentionConfig {
                recent_hours: 24,
                keep_days,
            });
            let mut state = RunState::empty(now);
            tracker.merge_and_prune(&mut state, &[article("https://x/1", now)], now);

            assert_eq!(state.len(), 1, "keep_days {keep_days}");
            assert!(!is_new(&article("https://x/1", now), &state));
        }

        let tracker = StateTracker::new(&RetentionConfig {
            recent_hours: i64::MIN,
            keep_days: 7,
        });
        assert!(tracker.is_recent(&article("a", now - Duration::hours(1)), now));

        // Representable but reaching past the earliest date: nothing is pruned.
        let tracker = StateTracker::new(&RetentionConfig {
            recent_hours: 24,
            keep_days: 10_000_000_000,
        });
        let mut state = RunState::empty(now);
        state.known_articles.push(known("https://x/old", now - Duration::days(3650)));
        tracker.merge_and_prune(&mut state, &[], now);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_prune_drops_stale_accepted_articles_too() {
        let now = Utc::now();
        let mut state = RunState::empty(now);

        StateTracker::default().merge_and_prune(
            &mut state,
            &[article("https://x/ancient", now - Duration::days(8))],
            now,
        );

        assert!(state.is_empty());
        assert!(
            state
                .known_articles
                .iter()
                .all(|a| a.published >= now - Duration::days(7))
        );
    }
}
