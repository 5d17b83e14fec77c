//! Per-statistic aggregators
//!
//! Each aggregator turns one parsed sentence into a batch of derived entities and counts every one
//! of them. A `Skipped` entry (malformed occurrence) is logged and passed over; a store error stops
//! the aggregator right there and is handed back to the caller.
use std::ops::AddAssign;
use errors::*;
use counter::Counter;
use entity::{self, CountedEntity, Derived};
use sentence::{Parse, ParsedSentence};
use store::CounterStore;

/// What happened to one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub counted: usize,
    pub skipped: usize,
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.counted += other.counted;
        self.skipped += other.skipped;
    }
}

pub trait Aggregator {
    fn name(&self) -> &'static str;

    /// Entities to count for this sentence, in counting order
    fn derive(&self, sentence: &ParsedSentence) -> Result<Vec<Derived>>;

    fn aggregate<S: CounterStore>(&self, sentence: &ParsedSentence, counter: &mut Counter<S>)
        -> Result<Tally> where Self: Sized {
        count_batch(self.name(), &self.derive(sentence)?, counter)
    }
}

/// Concatenate what `derive` gives for each parse of the sentence
fn per_parse(sentence: &ParsedSentence, derive: fn(&Parse) -> Result<Vec<Derived>>)
    -> Result<Vec<Derived>> {
    let mut out = vec![];
    for parse in &sentence.parses {
        out.extend(derive(parse)?);
    }
    Ok(out)
}

/// Count every entity in `batch`, skipping the ones that failed to derive
pub fn count_batch<S: CounterStore>(name: &str, batch: &[Derived], counter: &mut Counter<S>)
    -> Result<Tally> {
    let mut tally = Tally::default();
    for item in batch {
        match *item {
            Derived::Entity(ref e) => {
                counter.count_one(e)?;
                tally.counted += 1;
            }
            Derived::Skipped(ref why) => {
                debug!("{}: skipping one entity: {}", name, why);
                tally.skipped += 1;
            }
        }
    }
    Ok(tally)
}

/// One `SentenceMarker` per sentence and one `ParseMarker` per parse in it
pub struct SentenceParseCounter;

impl Aggregator for SentenceParseCounter {
    fn name(&self) -> &'static str { "sentences" }

    fn derive(&self, sentence: &ParsedSentence) -> Result<Vec<Derived>> {
        let mut out = vec![Derived::Entity(CountedEntity::SentenceMarker)];
        out.extend(sentence.parses.iter().map(|_| Derived::Entity(CountedEntity::ParseMarker)));
        Ok(out)
    }
}

pub struct WordCounter;

impl Aggregator for WordCounter {
    fn name(&self) -> &'static str { "words" }

    fn derive(&self, sentence: &ParsedSentence) -> Result<Vec<Derived>> {
        per_parse(sentence, entity::words)
    }
}

/// Co-occurrence pairs and their distances
pub struct PairCounter;

impl Aggregator for PairCounter {
    fn name(&self) -> &'static str { "pairs" }

    fn derive(&self, sentence: &ParsedSentence) -> Result<Vec<Derived>> {
        per_parse(sentence, entity::pairs)
    }
}

pub struct RelationCounter;

impl Aggregator for RelationCounter {
    fn name(&self) -> &'static str { "relations" }

    fn derive(&self, sentence: &ParsedSentence) -> Result<Vec<Derived>> {
        per_parse(sentence, entity::relations)
    }
}

pub struct DisjunctCounter;

impl Aggregator for DisjunctCounter {
    fn name(&self) -> &'static str { "disjuncts" }

    fn derive(&self, sentence: &ParsedSentence) -> Result<Vec<Derived>> {
        per_parse(sentence, entity::disjuncts)
    }
}

/// Every entity of a sentence, in the order `count_sentence` counts them
pub fn derive_all(sentence: &ParsedSentence) -> Result<Vec<Derived>> {
    let mut out = SentenceParseCounter.derive(sentence)?;
    out.extend(WordCounter.derive(sentence)?);
    out.extend(PairCounter.derive(sentence)?);
    out.extend(RelationCounter.derive(sentence)?);
    out.extend(DisjunctCounter.derive(sentence)?);
    Ok(out)
}

/// Run all aggregators over one sentence. Stops at the first store error.
pub fn count_sentence<S: CounterStore>(sentence: &ParsedSentence, counter: &mut Counter<S>)
    -> Result<Tally> {
    let mut tally = SentenceParseCounter.aggregate(sentence, counter)?;
    tally += WordCounter.aggregate(sentence, counter)?;
    tally += PairCounter.aggregate(sentence, counter)?;
    tally += RelationCounter.aggregate(sentence, counter)?;
    tally += DisjunctCounter.aggregate(sentence, counter)?;
    Ok(tally)
}
