//! Reader for sentences parsed elsewhere
//!
//! The dump format is one statement per line:
//!
//! ```text
//! sentence <id>
//! parse <id>
//! word <instance> <raw-position> [<word>]
//! link <type> <left-instance> <right-instance>
//! disjunct <instance> <connector>...
//! end
//! ```
//!
//! `word`, `link` and `disjunct` belong to the most recent `parse`, which belongs to the open
//! `sentence`. A `word` line without a word marks an instance the parser could not resolve; any
//! token given, `-` included, is taken literally. An instance gets at most one `disjunct` line per
//! parse. Lines starting with `#` and blank lines are ignored.
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{i64 as integer, space0, space1};
use nom::combinator::{all_consuming, map, opt, value};
use nom::multi::many0;
use nom::sequence::{preceded, terminated, tuple};
use errors::*;
use parser::Parser;
use sentence::{Connector, ConnectorSet, Parse, ParsedSentence, RelationEdge, WordInstance};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Sentence(&'a str),
    Parse(&'a str),
    Word(&'a str, i64, Option<&'a str>),
    Link(&'a str, &'a str, &'a str),
    Disjunct(&'a str, Vec<&'a str>),
    End,
}

fn field(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn arg(input: &str) -> IResult<&str, &str> {
    preceded(space1, field)(input)
}

fn sentence_line(input: &str) -> IResult<&str, Line> {
    map(preceded(tag("sentence"), arg), Line::Sentence)(input)
}

fn parse_line(input: &str) -> IResult<&str, Line> {
    map(preceded(tag("parse"), arg), Line::Parse)(input)
}

fn word_line(input: &str) -> IResult<&str, Line> {
    map(
        preceded(tag("word"), tuple((arg, preceded(space1, integer), opt(arg)))),
        |(instance, position, word)| Line::Word(instance, position, word),
    )(input)
}

fn link_line(input: &str) -> IResult<&str, Line> {
    map(preceded(tag("link"), tuple((arg, arg, arg))), |(t, l, r)| Line::Link(t, l, r))(input)
}

fn disjunct_line(input: &str) -> IResult<&str, Line> {
    map(preceded(tag("disjunct"), tuple((arg, many0(arg)))), |(i, cs)| Line::Disjunct(i, cs))(input)
}

fn line(input: &str) -> IResult<&str, Line> {
    all_consuming(terminated(
        alt((
            sentence_line,
            parse_line,
            word_line,
            link_line,
            disjunct_line,
            value(Line::End, tag("end")),
        )),
        space0,
    ))(input)
}

/// Read every sentence in `text`
pub fn read_dump(text: &str) -> Result<Vec<ParsedSentence>> {
    let mut done = vec![];
    let mut open: Option<ParsedSentence> = None;
    for (n, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let complain = |what: String| Error::ParseError(format!("line {}: {}", n + 1, what));
        let parsed = match line(trimmed) {
            Ok((_, parsed)) => parsed,
            Err(_) => return Err(complain(format!("can't read {:?}", trimmed))),
        };
        match parsed {
            Line::Sentence(id) => {
                if let Some(ref s) = open {
                    return Err(complain(format!("sentence {} has no end", s.id)));
                }
                open = Some(ParsedSentence::new(id));
            }
            Line::End => match open.take() {
                Some(s) => done.push(s),
                None => return Err(complain("end outside of a sentence".to_string())),
            },
            Line::Parse(id) => match open {
                Some(ref mut s) => s.parses.push(Parse::new(id)),
                None => return Err(complain(format!("parse {} outside of a sentence", id))),
            },
            other => {
                let parse = match open.as_mut().and_then(|s| s.parses.last_mut()) {
                    Some(p) => p,
                    None => return Err(complain("statement outside of a parse".to_string())),
                };
                match other {
                    Line::Word(instance, position, Some(word)) =>
                        parse.words.push(WordInstance::new(instance, position, word)),
                    Line::Word(instance, position, None) =>
                        parse.words.push(WordInstance::unresolved(instance, position)),
                    Line::Link(relation, left, right) =>
                        parse.links.push(RelationEdge::new(relation, left, right)),
                    Line::Disjunct(instance, connectors) => {
                        if parse.connector_sets.iter().any(|set| set.instance == instance) {
                            return Err(complain(format!(
                                "{} already has a disjunct in parse {}", instance, parse.id)));
                        }
                        let mut set = ConnectorSet { instance: instance.to_string(), connectors: vec![] };
                        for c in connectors {
                            match Connector::parse(c) {
                                Some(connector) => set.connectors.push(connector),
                                None => return Err(complain(format!("bad connector {:?}", c))),
                            }
                        }
                        parse.connector_sets.push(set);
                    }
                    Line::Sentence(_) | Line::Parse(_) | Line::End => unreachable!(),
                }
            }
        }
    }
    match open {
        Some(s) => Err(Error::ParseError(format!("sentence {} has no end", s.id))),
        None => Ok(done),
    }
}

/// Parser for text that is already a parse dump
#[derive(Default)]
pub struct DumpParser;

impl Parser for DumpParser {
    fn parse(&mut self, text: &str) -> Result<Vec<ParsedSentence>> {
        read_dump(text)
    }
}
