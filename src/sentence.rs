//! Parsed sentences, as handed over by a parser
//!
//! A sentence holds one or more candidate parses. Each parse has its own word instances, the typed
//! links between them, and the connector set the parser attached to each instance. Links and
//! connector sets refer to word instances by instance id; an instance id is resolved to its word
//! through the parse itself.
use errors::*;

/// One word at one place in one parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordInstance {
    /// Per-parse identity, e.g. `dog@3f2a`
    pub instance: String,
    /// Position in the parser's raw numbering. Not necessarily zero-based.
    pub position: i64,
    /// `None` when the parser could not tell which word this instance is
    pub word: Option<String>,
}

impl WordInstance {
    pub fn new(instance: &str, position: i64, word: &str) -> Self {
        WordInstance {
            instance: instance.to_string(),
            position: position,
            word: Some(word.to_string()),
        }
    }

    /// An instance without a resolvable word
    pub fn unresolved(instance: &str, position: i64) -> Self {
        WordInstance {
            instance: instance.to_string(),
            position: position,
            word: None,
        }
    }
}

/// A typed, directed link between two word instances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    pub relation: String,
    pub left: String,
    pub right: String,
}

impl RelationEdge {
    pub fn new(relation: &str, left: &str, right: &str) -> Self {
        RelationEdge {
            relation: relation.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Which way a connector points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Direction::Left => "-",
            Direction::Right => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub label: String,
    pub direction: Direction,
}

impl Connector {
    /// Read `Ss+` or `Wd-` style connectors
    pub fn parse(text: &str) -> Option<Connector> {
        let direction = if text.ends_with('+') {
            Direction::Right
        } else if text.ends_with('-') {
            Direction::Left
        } else {
            return None;
        };
        let label = &text[..text.len() - 1];
        if label.is_empty() {
            return None;
        }
        Some(Connector { label: label.to_string(), direction: direction })
    }
}

/// The link slots used by one word instance in one parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorSet {
    pub instance: String,
    pub connectors: Vec<Connector>,
}

impl ConnectorSet {
    /// The connector sequence without any instance identity, e.g. `Wd- Ss+`
    pub fn pattern(&self) -> String {
        self.connectors.iter()
            .map(|c| format!("{}{}", c.label, c.direction.as_str()))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// One candidate analysis of a sentence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parse {
    pub id: String,
    pub words: Vec<WordInstance>,
    pub links: Vec<RelationEdge>,
    pub connector_sets: Vec<ConnectorSet>,
}

impl Parse {
    pub fn new(id: &str) -> Self {
        Parse { id: id.to_string(), ..Default::default() }
    }

    /// Reduce a word instance id to its word
    pub fn resolve(&self, instance: &str) -> Result<&str> {
        match self.words.iter().find(|w| w.instance == instance) {
            Some(w) => w.resolve(),
            None => Err(Error::MalformedOccurrence(
                format!("parse {} has no word instance {}", self.id, instance))),
        }
    }
}

impl WordInstance {
    pub fn resolve(&self) -> Result<&str> {
        self.word.as_ref()
            .map(|w| w.as_str())
            .ok_or_else(|| Error::MalformedOccurrence(
                format!("word instance {} has no word", self.instance)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedSentence {
    pub id: String,
    pub parses: Vec<Parse>,
}

impl ParsedSentence {
    pub fn new(id: &str) -> Self {
        ParsedSentence { id: id.to_string(), parses: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_parsing() {
        assert_eq!(Connector::parse("Ss+"),
            Some(Connector { label: "Ss".into(), direction: Direction::Right }));
        assert_eq!(Connector::parse("Wd-").map(|c| c.direction), Some(Direction::Left));
        assert_eq!(Connector::parse("Ss"), None);
        assert_eq!(Connector::parse("+"), None);
    }

    #[test]
    fn pattern_drops_instance() {
        let set = ConnectorSet {
            instance: "dog@1".into(),
            connectors: vec![
                Connector::parse("Ds-").unwrap(),
                Connector::parse("Ss+").unwrap(),
            ],
        };
        assert_eq!(set.pattern(), "Ds- Ss+");
    }

    #[test]
    fn resolving_instances() {
        let mut parse = Parse::new("p1");
        parse.words.push(WordInstance::new("dog@1", 1, "dog"));
        parse.words.push(WordInstance::unresolved("x@2", 2));
        assert_eq!(parse.resolve("dog@1").unwrap(), "dog");
        assert!(parse.resolve("x@2").unwrap_err().is_malformed());
        assert!(parse.resolve("cat@9").unwrap_err().is_malformed());
    }
}
