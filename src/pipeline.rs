//! Sentence pipeline driver
//!
//! Hands raw text to a parser, then pulls parsed sentences one at a time, runs every aggregator
//! over each and discards it, until the parser has nothing left.
use std::time::Instant;
use errors::*;
use aggregate::{self, Tally};
use counter::Counter;
use sentence::ParsedSentence;
use store::CounterStore;

/// Where parsed sentences come from
pub trait SentenceSource {
    /// Queue text for parsing
    fn submit(&mut self, text: &str) -> Result<()>;

    /// The next parsed sentence, or `None` once the queue is empty
    fn next_sentence(&mut self) -> Result<Option<ParsedSentence>>;

    /// Release a sentence handed out by `next_sentence`
    fn discard(&mut self, sentence: ParsedSentence);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Processing,
}

/// Counts processed sentences and logs the rate now and then
pub struct RateMonitor {
    every: u64,
    count: u64,
    start: Instant,
}

impl RateMonitor {
    pub fn new(every: u64) -> Self {
        RateMonitor { every: every, count: 0, start: Instant::now() }
    }

    pub fn tick(&mut self) {
        self.count += 1;
        if self.every > 0 && self.count % self.every == 0 {
            let secs = self.start.elapsed().as_secs_f64();
            let rate = if secs > 0.0 { self.count as f64 / secs } else { 0.0 };
            info!("Processed {} sentences, {:.1} per second", self.count, rate);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

pub struct Pipeline<Q, S> {
    source: Q,
    counter: Counter<S>,
    monitor: RateMonitor,
    state: DriverState,
}

impl<Q: SentenceSource, S: CounterStore> Pipeline<Q, S> {
    pub fn new(source: Q, store: S) -> Self {
        Pipeline {
            source: source,
            counter: Counter::new(store),
            monitor: RateMonitor::new(1000),
            state: DriverState::Idle,
        }
    }

    pub fn with_monitor(mut self, monitor: RateMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    /// Parse and count one block of text
    ///
    /// Returns once the parser's queue is drained, or at the first store error. Counters persisted
    /// before an error stay persisted; the sentence that hit it is discarded all the same.
    pub fn observe_text(&mut self, text: &str) -> Result<Tally> {
        self.source.submit(text)?;
        self.drain()
    }

    /// Count every sentence the source has ready
    pub fn drain(&mut self) -> Result<Tally> {
        let mut tally = Tally::default();
        loop {
            let sentence = match self.source.next_sentence()? {
                Some(sentence) => sentence,
                None => {
                    self.state = DriverState::Idle;
                    return Ok(tally);
                }
            };
            self.state = DriverState::Processing;
            let outcome = aggregate::count_sentence(&sentence, &mut self.counter);
            if let Err(ref err) = outcome {
                warn!("Gave up on sentence {}: {}", sentence.id, err);
            }
            self.source.discard(sentence);
            self.monitor.tick();
            self.state = DriverState::Idle;
            tally += outcome?;
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Sentences processed so far, whatever became of their counts
    pub fn sentences(&self) -> u64 {
        self.monitor.count()
    }

    pub fn counter(&self) -> &Counter<S> {
        &self.counter
    }

    pub fn source(&self) -> &Q {
        &self.source
    }

    pub fn into_store(self) -> S {
        self.counter.into_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use entity::CountedEntity;
    use sentence::{Parse, WordInstance};
    use store::MemoryStore;

    /// Splits on whitespace, one sentence per line, no links
    #[derive(Default)]
    struct LineSource {
        queue: VecDeque<ParsedSentence>,
        discarded: Vec<String>,
        submitted: usize,
    }

    impl SentenceSource for LineSource {
        fn submit(&mut self, text: &str) -> Result<()> {
            self.submitted += 1;
            for (n, line) in text.lines().enumerate() {
                let mut parse = Parse::new(&format!("p{}", n));
                parse.words.push(WordInstance::new("wall", 0, "LEFT-WALL"));
                for (i, w) in line.split_whitespace().enumerate() {
                    let instance = format!("{}@{}", w, i);
                    if w == "?" {
                        parse.words.push(WordInstance::unresolved(&instance, i as i64 + 1));
                    } else {
                        parse.words.push(WordInstance::new(&instance, i as i64 + 1, w));
                    }
                }
                let mut s = ParsedSentence::new(&format!("s{}", n));
                s.parses.push(parse);
                self.queue.push_back(s);
            }
            Ok(())
        }

        fn next_sentence(&mut self) -> Result<Option<ParsedSentence>> {
            Ok(self.queue.pop_front())
        }

        fn discard(&mut self, sentence: ParsedSentence) {
            self.discarded.push(sentence.id);
        }
    }

    fn word(w: &str) -> CountedEntity { CountedEntity::WordEntity(w.into()) }

    #[test]
    fn drains_the_queue() {
        let mut pipeline = Pipeline::new(LineSource::default(), MemoryStore::new());
        let tally = pipeline.observe_text("a b\nb c\nc").unwrap();
        assert_eq!(pipeline.state(), DriverState::Idle);
        assert_eq!(pipeline.sentences(), 3);
        assert_eq!(pipeline.source().discarded, vec!["s0", "s1", "s2"]);
        assert_eq!(pipeline.source().submitted, 1);
        assert_eq!(tally.skipped, 0);
        let store = pipeline.into_store();
        assert_eq!(store.get(&CountedEntity::SentenceMarker), 3);
        assert_eq!(store.get(&word("b")), 2);
        assert_eq!(store.get(&word("LEFT-WALL")), 3);
    }

    #[test]
    fn empty_text_is_not_an_error() {
        let mut pipeline = Pipeline::new(LineSource::default(), MemoryStore::new());
        assert_eq!(pipeline.observe_text("").unwrap(), Tally::default());
        assert_eq!(pipeline.sentences(), 0);
    }

    #[test]
    fn malformed_words_are_contained() {
        let mut pipeline = Pipeline::new(LineSource::default(), MemoryStore::new());
        let tally = pipeline.observe_text("a ? b").unwrap();
        // the word itself, plus three pairs and their distances
        assert_eq!(tally.skipped, 7);
        let store = pipeline.into_store();
        assert_eq!(store.get(&word("a")), 1);
        assert_eq!(store.get(&CountedEntity::PairDistance("a".into(), "b".into(), 2)), 1);
    }

    #[test]
    fn store_error_aborts_but_discards() {
        let mut store = MemoryStore::new();
        store.fail_persist_after(3);
        let mut pipeline = Pipeline::new(LineSource::default(), store);
        let err = pipeline.observe_text("a b\nc d").unwrap_err();
        assert!(err.is_store_error());
        assert_eq!(pipeline.source().discarded, vec!["s0"]);
        assert_eq!(pipeline.sentences(), 1);
        assert_eq!(pipeline.state(), DriverState::Idle);
        assert_eq!(pipeline.source().queue.len(), 1);

        let store = pipeline.into_store();
        assert_eq!(store.get(&CountedEntity::SentenceMarker), 1);
        assert_eq!(store.get(&CountedEntity::ParseMarker), 1);
        assert_eq!(store.get(&word("LEFT-WALL")), 1);
        assert_eq!(store.get(&word("a")), 0);
    }

    #[test]
    fn counts_resume_across_runs() {
        let mut first = Pipeline::new(LineSource::default(), MemoryStore::new());
        first.observe_text("x y").unwrap();
        let store = first.into_store();
        let mut second = Pipeline::new(LineSource::default(), store);
        second.observe_text("x y").unwrap();
        let store = second.into_store();
        assert_eq!(store.get(&CountedEntity::SentencePair("x".into(), "y".into())), 2);
        assert_eq!(store.get(&CountedEntity::SentenceMarker), 2);
    }

    #[test]
    fn monitor_counts_ticks() {
        let mut monitor = RateMonitor::new(2);
        for _ in 0..5 {
            monitor.tick();
        }
        assert_eq!(monitor.count(), 5);
    }
}
