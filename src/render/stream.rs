use async_trait::async_trait;
use std::str::SplitWhitespace;
use std::time::Duration;

/// Words of a text, each followed by a single space
pub struct WordStream<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> WordStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            words: text.split_whitespace(),
        }
    }
}

impl Iterator for WordStream<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.words.next().map(|word| format!("{} ", word))
    }
}

/// Paces streamed output between words
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleep a fixed time after every word
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// No pacing at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}

/// Feed `text` to `sink` word by word, pausing after each word
pub async fn stream_words<P, F>(text: &str, pacer: &P, mut sink: F)
where
    P: Pacer + ?Sized,
    F: FnMut(&str),
{
    for word in WordStream::new(text) {
        sink(&word);
        pacer.pause().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPacer(AtomicUsize);

    #[async_trait]
    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_word_stream_splits_on_whitespace() {
        let words: Vec<String> = WordStream::new("Alice  reports\nto Bob").collect();
        assert_eq!(words, vec!["Alice ", "reports ", "to ", "Bob "]);
        assert_eq!(WordStream::new("   ").count(), 0);
    }

    #[tokio::test]
    async fn test_stream_words_pauses_after_each_word() {
        let pacer = CountingPacer::default();
        let mut out = String::new();
        stream_words("one two three", &pacer, |w| out.push_str(w)).await;

        assert_eq!(out, "one two three ");
        assert_eq!(pacer.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_delay_streams_everything() {
        let mut count = 0;
        stream_words("a b", &NoDelay, |_| count += 1).await;
        assert_eq!(count, 2);
    }
}
