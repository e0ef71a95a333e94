use chrono::{DateTime, Local};
use std::collections::VecDeque;

pub const DEFAULT_MAX_TWEETS: usize = 5;

#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub text: String,
    pub received_at: DateTime<Local>,
}

/// Capacity-bounded feed of recent tweet texts, newest first.
#[derive(Debug, Clone)]
pub struct TweetFeed {
    entries: VecDeque<FeedEntry>,
    max_tweets: usize,
    /// Entries added since the last viewport change, capped at `max_tweets`.
    count: usize,
}

impl TweetFeed {
    pub fn new(max_tweets: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_tweets),
            max_tweets,
            count: 0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.push_at(text, Local::now());
    }

    pub fn push_at(&mut self, text: impl Into<String>, received_at: DateTime<Local>) {
        if self.count >= self.max_tweets {
            self.entries.pop_back();
        } else {
            self.count += 1;
        }
        if self.max_tweets == 0 {
            return;
        }
        self.entries.push_front(FeedEntry {
            text: text.into(),
            received_at,
        });
    }

    /// Empties the visible feed and resets the session counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_tweets(&self) -> usize {
        self.max_tweets
    }
}

impl Default for TweetFeed {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TWEETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(feed: &TweetFeed) -> Vec<&str> {
        feed.entries().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_newest_first() {
        let mut feed = TweetFeed::default();
        feed.push("a");
        feed.push("b");
        assert_eq!(texts(&feed), vec!["b", "a"]);
        assert_eq!(feed.count(), 2);
    }

    #[test]
    fn test_evicts_oldest_on_overflow() {
        let mut feed = TweetFeed::default();
        for i in 1..=6 {
            feed.push(format!("t{}", i));
        }
        assert_eq!(texts(&feed), vec!["t6", "t5", "t4", "t3", "t2"]);
        assert_eq!(feed.count(), 5);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut feed = TweetFeed::new(3);
        for i in 0..50 {
            feed.push(format!("t{}", i));
            assert!(feed.len() <= 3);
            assert_eq!(feed.len(), feed.count());
        }
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut feed = TweetFeed::default();
        for i in 0..7 {
            feed.push(format!("t{}", i));
        }
        feed.clear();
        assert!(feed.is_empty());
        assert_eq!(feed.count(), 0);

        feed.push("fresh");
        assert_eq!(texts(&feed), vec!["fresh"]);
        assert_eq!(feed.count(), 1);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut feed = TweetFeed::new(0);
        feed.push("dropped");
        assert!(feed.is_empty());
    }
}
