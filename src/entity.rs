//! Countable entities and how they are derived from a parse
//!
//! Every entity is keyed by value. The same word, pair, relation or disjunct seen in two different
//! sentences reduces to an equal `CountedEntity`, and so to the same persisted counter.
use std::fmt;
use errors::*;
use sentence::{Parse, WordInstance};

/// The unit of aggregation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountedEntity {
    SentenceMarker,
    ParseMarker,
    WordEntity(String),
    /// Ordered pair of words from one sentence, left before right
    SentencePair(String, String),
    /// The same pair with the distance right - left between them
    PairDistance(String, String, i64),
    /// Relation type, left word, right word
    RelationTriple(String, String, String),
    /// Word and connector pattern
    WordConnectorSet(String, String),
}

/// The names used for each kind of entity in a store
pub const KINDS: [&'static str; 7] =
    ["sentence", "parse", "word", "pair", "distance", "relation", "disjunct"];

impl CountedEntity {
    pub fn kind(&self) -> &'static str {
        match *self {
            CountedEntity::SentenceMarker => "sentence",
            CountedEntity::ParseMarker => "parse",
            CountedEntity::WordEntity(_) => "word",
            CountedEntity::SentencePair(_, _) => "pair",
            CountedEntity::PairDistance(_, _, _) => "distance",
            CountedEntity::RelationTriple(_, _, _) => "relation",
            CountedEntity::WordConnectorSet(_, _) => "disjunct",
        }
    }

    /// Flatten into (kind, left, right, label) for storage. Unused fields are empty.
    pub fn columns(&self) -> (&'static str, String, String, String) {
        let kind = self.kind();
        match *self {
            CountedEntity::SentenceMarker | CountedEntity::ParseMarker =>
                (kind, String::new(), String::new(), String::new()),
            CountedEntity::WordEntity(ref w) =>
                (kind, w.clone(), String::new(), String::new()),
            CountedEntity::SentencePair(ref l, ref r) =>
                (kind, l.clone(), r.clone(), String::new()),
            CountedEntity::PairDistance(ref l, ref r, d) =>
                (kind, l.clone(), r.clone(), d.to_string()),
            CountedEntity::RelationTriple(ref rel, ref l, ref r) =>
                (kind, l.clone(), r.clone(), rel.clone()),
            CountedEntity::WordConnectorSet(ref w, ref pattern) =>
                (kind, w.clone(), String::new(), pattern.clone()),
        }
    }

    /// Inverse of `columns`
    pub fn from_columns(kind: &str, left: &str, right: &str, label: &str) -> Result<CountedEntity> {
        Ok(match kind {
            "sentence" => CountedEntity::SentenceMarker,
            "parse" => CountedEntity::ParseMarker,
            "word" => CountedEntity::WordEntity(left.to_string()),
            "pair" => CountedEntity::SentencePair(left.to_string(), right.to_string()),
            "distance" => {
                let distance = label.parse::<i64>()
                    .map_err(|_| Error::StoreError(format!("bad distance {:?}", label)))?;
                CountedEntity::PairDistance(left.to_string(), right.to_string(), distance)
            }
            "relation" => CountedEntity::RelationTriple(
                label.to_string(), left.to_string(), right.to_string()),
            "disjunct" => CountedEntity::WordConnectorSet(left.to_string(), label.to_string()),
            _ => return Err(Error::StoreError(format!("unknown entity kind {:?}", kind))),
        })
    }
}

impl fmt::Display for CountedEntity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CountedEntity::SentenceMarker => write!(f, "sentences"),
            CountedEntity::ParseMarker => write!(f, "parses"),
            CountedEntity::WordEntity(ref w) => write!(f, "{}", w),
            CountedEntity::SentencePair(ref l, ref r) => write!(f, "{}\t{}", l, r),
            CountedEntity::PairDistance(ref l, ref r, d) => write!(f, "{}\t{}\t{}", l, r, d),
            CountedEntity::RelationTriple(ref rel, ref l, ref r) =>
                write!(f, "{}\t{}\t{}", rel, l, r),
            CountedEntity::WordConnectorSet(ref w, ref pattern) => write!(f, "{}\t{}", w, pattern),
        }
    }
}

/// Outcome of deriving one entity
///
/// A derivation that hit a malformed occurrence is kept as `Skipped` so the rest of the batch
/// goes on unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derived {
    Entity(CountedEntity),
    Skipped(String),
}

impl Derived {
    pub fn entity(&self) -> Option<&CountedEntity> {
        match *self {
            Derived::Entity(ref e) => Some(e),
            Derived::Skipped(_) => None,
        }
    }

    /// Contain a malformed occurrence as `Skipped`. Any other error is passed on.
    pub fn contain(res: Result<CountedEntity>) -> Result<Derived> {
        match res {
            Ok(entity) => Ok(Derived::Entity(entity)),
            Err(Error::MalformedOccurrence(why)) => Ok(Derived::Skipped(why)),
            Err(err) => Err(err),
        }
    }
}

/// A word instance with its position relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'p> {
    /// Position in the parser's numbering
    pub raw: i64,
    /// Offset from the anchor, `None` if it doesn't fit in an `i64`
    pub position: Option<i64>,
    pub instance: &'p WordInstance,
}

/// The parse's words sorted by position, renumbered so the anchor sits at 0
///
/// The anchor is whichever instance has the lowest raw position.
pub fn word_sequence(parse: &Parse) -> Vec<Located> {
    let anchor = match parse.words.iter().map(|w| w.position).min() {
        Some(p) => p,
        None => return vec![],
    };
    let mut seq: Vec<Located> = parse.words.iter()
        .map(|w| Located {
            raw: w.position,
            position: w.position.checked_sub(anchor),
            instance: w,
        })
        .collect();
    seq.sort_by_key(|l| l.raw);
    seq
}

/// One `WordEntity` per occurrence, repeats included
pub fn words(parse: &Parse) -> Result<Vec<Derived>> {
    word_sequence(parse).iter()
        .map(|l| Derived::contain(
            l.instance.resolve().map(|w| CountedEntity::WordEntity(w.to_string()))))
        .collect()
}

/// Every left word against every later word: a `SentencePair` then its `PairDistance`
///
/// The pair only needs both words. The distance also needs the right word strictly after the
/// left one, so words sharing a position keep their pair but lose the distance.
pub fn pairs(parse: &Parse) -> Result<Vec<Derived>> {
    let seq = word_sequence(parse);
    let mut out = Vec::with_capacity(seq.len() * seq.len().saturating_sub(1));
    for (i, left) in seq.iter().enumerate() {
        for right in &seq[i + 1..] {
            let words = left.instance.resolve()
                .and_then(|l| right.instance.resolve().map(|r| (l, r)));
            match words {
                Ok((l, r)) => {
                    out.push(Derived::Entity(
                        CountedEntity::SentencePair(l.to_string(), r.to_string())));
                    out.push(Derived::contain(distance(left, right)
                        .map(|d| CountedEntity::PairDistance(l.to_string(), r.to_string(), d)))?);
                }
                Err(err) => {
                    let skipped = Derived::contain(Err(err))?;
                    out.push(skipped.clone());
                    out.push(skipped);
                }
            }
        }
    }
    Ok(out)
}

fn distance(left: &Located, right: &Located) -> Result<i64> {
    match right.raw.checked_sub(left.raw) {
        Some(d) if d > 0 => Ok(d),
        Some(_) => Err(Error::MalformedOccurrence(format!(
            "{} and {} share position {}",
            left.instance.instance, right.instance.instance, left.raw))),
        None => Err(Error::MalformedOccurrence(format!(
            "{} and {} are too far apart to measure",
            left.instance.instance, right.instance.instance))),
    }
}

/// One `RelationTriple` per link, with the instances reduced to their words
pub fn relations(parse: &Parse) -> Result<Vec<Derived>> {
    parse.links.iter()
        .map(|link| {
            let res = parse.resolve(&link.left).and_then(|l| {
                let r = parse.resolve(&link.right)?;
                Ok(CountedEntity::RelationTriple(
                    link.relation.clone(), l.to_string(), r.to_string()))
            });
            Derived::contain(res)
        })
        .collect()
}

/// One `WordConnectorSet` per word instance that has a connector set
///
/// A second set for an instance already seen is malformed; a word has one set per parse.
pub fn disjuncts(parse: &Parse) -> Result<Vec<Derived>> {
    let mut seen: Vec<&str> = vec![];
    parse.connector_sets.iter()
        .map(|set| {
            let res = if seen.contains(&set.instance.as_str()) {
                Err(Error::MalformedOccurrence(
                    format!("{} has more than one connector set", set.instance)))
            } else {
                seen.push(&set.instance);
                parse.resolve(&set.instance)
                    .map(|w| CountedEntity::WordConnectorSet(w.to_string(), set.pattern()))
            };
            Derived::contain(res)
        })
        .collect()
}
