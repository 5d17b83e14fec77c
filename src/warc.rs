//! Web ARChive format reader
//!
//! Only what is needed to pull text out of WET files: headers are parsed for `Content-Length` and
//! `WARC-Type` and otherwise ignored, and only the payload is returned. `warcinfo` records carry
//! no text and are passed over.
use std::io::{self, BufRead, Read};
use nom::IResult;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, space0};
use nom::combinator::all_consuming;
use nom::sequence::{preceded, separated_pair, tuple};
const SIZE_LIMIT: u64 = 1 << 20;

/// Warc record (we only keep the payload)
pub type Record = String;

/// Stream WARC records out of any buffered reader, e.g. a locked stdin
pub struct WarcReader<R> {
    input: R,
    done: bool,
}

impl<R: BufRead> WarcReader<R> {
    pub fn new(input: R) -> Self {
        WarcReader { input: input, done: false }
    }

    /// One line without its line ending, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = vec![];
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        while buf.last() == Some(&b'\n') || buf.last() == Some(&b'\r') {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn next_record(&mut self) -> io::Result<Option<Record>> {
        loop {
            // Skip along to the next version line. WARC's break sometimes.
            loop {
                match self.read_line()? {
                    None => return Ok(None),
                    Some(ref line) if version_line(line).is_ok() => break,
                    Some(_) => continue,
                }
            }

            let mut length: Option<u64> = None;
            let mut kind = String::new();
            let mut damaged = false;
            loop {
                let line = match self.read_line()? {
                    None => return Ok(None),
                    Some(line) => line,
                };
                if line.is_empty() {
                    break;
                }
                match header_line(&line) {
                    Ok((_, (name, value))) => {
                        if name.eq_ignore_ascii_case("Content-Length") {
                            length = value.trim().parse().ok();
                        } else if name.eq_ignore_ascii_case("WARC-Type") {
                            kind = value.trim().to_string();
                        }
                    }
                    Err(_) => {
                        damaged = true;
                        break;
                    }
                }
            }
            let length = match length {
                Some(length) if !damaged => length,
                _ => {
                    warn!("Skipping a WARC record with broken headers");
                    continue;
                }
            };

            if length > SIZE_LIMIT || kind == "warcinfo" {
                if length > SIZE_LIMIT {
                    warn!("Trashing a record that wants {} bytes", length);
                }
                io::copy(&mut (&mut self.input).take(length), &mut io::sink())?;
                continue;
            }
            let mut payload = Vec::with_capacity(length as usize);
            (&mut self.input).take(length).read_to_end(&mut payload)?;
            if (payload.len() as u64) < length {
                warn!("WARC record cut short at {} of {} bytes", payload.len(), length);
            }
            return Ok(Some(String::from_utf8_lossy(&payload).into_owned()));
        }
    }
}

impl<R: BufRead> Iterator for WarcReader<R> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                warn!("Stopped reading WARC input: {}", err);
                self.done = true;
                None
            }
        }
    }
}

fn is_token_char(c: char) -> bool {
    match c as u32 {
        33 | 35..=39 | 42 | 43 | 45 | 48..=57 | 65..=90 | 94..=122 | 124 => true,
        _ => false,
    }
}

fn version_line(input: &str) -> IResult<&str, &str> {
    all_consuming(preceded(
        tuple((tag("WARC/"), space0)),
        take_while1(|c: char| c == '.' || c.is_ascii_digit()),
    ))(input)
}

fn header_line(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(
        take_while1(is_token_char),
        tuple((space0, char(':'), space0)),
        take_while(|c: char| !c.is_control() || c == '\t'),
    ))(input)
}
