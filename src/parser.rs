//! Parsers and the queue in front of them
//!
//! A `Parser` turns raw text into parsed sentences; `ParseQueue` holds its output until the
//! pipeline asks for it. `AnyParser` is the built-in parser: it knows no grammar at all and links
//! the words of each sentence into random planar trees, which is enough to collect co-occurrence
//! and disjunct statistics from unannotated text.
use std::collections::VecDeque;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use unicode_segmentation::UnicodeSegmentation;
use errors::*;
use pipeline::SentenceSource;
use sentence::{Connector, ConnectorSet, Direction, Parse, ParsedSentence, RelationEdge,
               WordInstance};

/// The sentence-initial anchor
pub const LEFT_WALL: &'static str = "LEFT-WALL";
/// The only link type `AnyParser` produces
pub const ANY_LINK: &'static str = "ANY";

pub trait Parser {
    fn parse(&mut self, text: &str) -> Result<Vec<ParsedSentence>>;
}

/// FIFO of parsed sentences waiting to be counted
pub struct ParseQueue<P> {
    parser: P,
    ready: VecDeque<ParsedSentence>,
    in_flight: usize,
}

impl<P: Parser> ParseQueue<P> {
    pub fn new(parser: P) -> Self {
        ParseQueue { parser: parser, ready: VecDeque::new(), in_flight: 0 }
    }

    /// Sentences parsed but not yet handed out
    pub fn pending(&self) -> usize {
        self.ready.len()
    }

    /// Sentences handed out but not yet discarded
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl<P: Parser> SentenceSource for ParseQueue<P> {
    fn submit(&mut self, text: &str) -> Result<()> {
        let parsed = self.parser.parse(text)?;
        debug!("Parsed {} sentences", parsed.len());
        self.ready.extend(parsed);
        Ok(())
    }

    fn next_sentence(&mut self) -> Result<Option<ParsedSentence>> {
        Ok(self.ready.pop_front().map(|s| {
            self.in_flight += 1;
            s
        }))
    }

    fn discard(&mut self, _sentence: ParsedSentence) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// Random planar parses over unicode-segmented text
pub struct AnyParser {
    linkages: usize,
    rng: StdRng,
    sentences: u64,
}

impl AnyParser {
    /// `linkages` parses per sentence (at least one), reproducible for a given seed
    pub fn new(linkages: usize, seed: u64) -> Self {
        AnyParser {
            linkages: linkages.max(1),
            rng: StdRng::seed_from_u64(seed),
            sentences: 0,
        }
    }

    fn linkage(&mut self, sentence_id: &str, k: usize, words: &[&str]) -> Parse {
        let mut parse = Parse::new(&format!("{}.{}", sentence_id, k));
        let tokens: Vec<&str> = Some(LEFT_WALL).into_iter().chain(words.iter().cloned()).collect();
        let instances: Vec<String> = tokens.iter().enumerate()
            .map(|(i, t)| format!("{}@{}.{}", t, parse.id, i))
            .collect();
        for (i, token) in tokens.iter().enumerate() {
            parse.words.push(WordInstance::new(&instances[i], i as i64, token));
        }

        let mut arcs = vec![];
        planar(&mut self.rng, 0, tokens.len() - 1, &mut arcs);
        arcs.sort();
        for &(l, r) in &arcs {
            parse.links.push(RelationEdge::new(ANY_LINK, &instances[l], &instances[r]));
        }

        for i in 0..tokens.len() {
            // farthest left partner first, then nearest right partner first
            let mut connectors: Vec<Connector> = arcs.iter()
                .filter(|&&(_, r)| r == i)
                .map(|_| Connector { label: ANY_LINK.to_string(), direction: Direction::Left })
                .collect();
            connectors.extend(arcs.iter()
                .filter(|&&(l, _)| l == i)
                .map(|_| Connector { label: ANY_LINK.to_string(), direction: Direction::Right }));
            parse.connector_sets.push(ConnectorSet {
                instance: instances[i].clone(),
                connectors: connectors,
            });
        }
        parse
    }
}

/// Link `lo..=hi` into a tree with no crossing arcs. Returns the root.
fn planar<R: Rng>(rng: &mut R, lo: usize, hi: usize, arcs: &mut Vec<(usize, usize)>) -> usize {
    if lo == hi {
        return lo;
    }
    let split = rng.gen_range(lo..hi);
    let left = planar(rng, lo, split, arcs);
    let right = planar(rng, split + 1, hi, arcs);
    arcs.push((left, right));
    if rng.gen::<bool>() { left } else { right }
}

impl Parser for AnyParser {
    fn parse(&mut self, text: &str) -> Result<Vec<ParsedSentence>> {
        let mut out = vec![];
        for raw in text.unicode_sentences() {
            let words: Vec<&str> = raw.unicode_words().collect();
            if words.is_empty() {
                continue;
            }
            self.sentences += 1;
            let mut sentence = ParsedSentence::new(&format!("sentence-{}", self.sentences));
            for k in 0..self.linkages {
                let parse = self.linkage(&sentence.id, k, &words);
                sentence.parses.push(parse);
            }
            out.push(sentence);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity;

    fn crosses(a: (usize, usize), b: (usize, usize)) -> bool {
        (a.0 < b.0 && b.0 < a.1 && a.1 < b.1) || (b.0 < a.0 && a.0 < b.1 && b.1 < a.1)
    }

    #[test]
    fn planar_trees_are_trees() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..12 {
            let mut arcs = vec![];
            planar(&mut rng, 0, n - 1, &mut arcs);
            assert_eq!(arcs.len(), n - 1);
            for a in &arcs {
                assert!(a.0 < a.1);
                for b in &arcs {
                    assert!(!crosses(*a, *b));
                }
            }
        }
    }

    #[test]
    fn wall_leads_every_parse() {
        let mut parser = AnyParser::new(3, 1);
        let sentences = parser.parse("The dog ran. It was fast!").unwrap();
        assert_eq!(sentences.len(), 2);
        for s in &sentences {
            assert_eq!(s.parses.len(), 3);
            for p in &s.parses {
                let seq = entity::word_sequence(p);
                assert_eq!(seq[0].position, Some(0));
                assert_eq!(seq[0].instance.word, Some(LEFT_WALL.to_string()));
                assert_eq!(p.links.len(), p.words.len() - 1);
                assert_eq!(p.connector_sets.len(), p.words.len());
            }
        }
        let words: Vec<String> = sentences[0].parses[0].words.iter()
            .filter_map(|w| w.word.clone()).collect();
        assert_eq!(words, vec!["LEFT-WALL", "The", "dog", "ran"]);
    }

    #[test]
    fn single_word_links_to_wall() {
        let mut parser = AnyParser::new(1, 0);
        let sentences = parser.parse("Hello").unwrap();
        let p = &sentences[0].parses[0];
        assert_eq!(p.links, vec![
            RelationEdge::new(ANY_LINK, &p.words[0].instance, &p.words[1].instance)]);
        assert_eq!(p.connector_sets[0].pattern(), "ANY+");
        assert_eq!(p.connector_sets[1].pattern(), "ANY-");
    }

    #[test]
    fn same_seed_same_parses() {
        let text = "one two three four five six seven";
        let a = AnyParser::new(2, 99).parse(text).unwrap();
        let b = AnyParser::new(2, 99).parse(text).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        let mut parser = AnyParser::new(1, 0);
        assert!(parser.parse("... !!").unwrap().is_empty());
    }

    #[test]
    fn queue_tracks_in_flight() {
        let mut queue = ParseQueue::new(AnyParser::new(1, 0));
        queue.submit("A b. C d.").unwrap();
        assert_eq!(queue.pending(), 2);
        let first = queue.next_sentence().unwrap().unwrap();
        assert_eq!(queue.in_flight(), 1);
        queue.discard(first);
        assert_eq!(queue.in_flight(), 0);
        assert!(queue.next_sentence().unwrap().is_some());
        assert!(queue.next_sentence().unwrap().is_none());
    }
}
