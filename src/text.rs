//! Splitting an input stream into blocks for `observe_text`
use std::io::{self, BufRead};

/// Blank-line separated paragraphs
pub struct Paragraphs<R> {
    input: R,
    done: bool,
}

impl<R: BufRead> Paragraphs<R> {
    pub fn new(input: R) -> Self {
        Paragraphs { input: input, done: false }
    }
}

impl<R: BufRead> Iterator for Paragraphs<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        collect_block(&mut self.input, &mut self.done, |line| line.trim().is_empty(), false)
    }
}

/// Dump sentences, each block running through its `end` line
pub struct DumpBlocks<R> {
    input: R,
    done: bool,
}

impl<R: BufRead> DumpBlocks<R> {
    pub fn new(input: R) -> Self {
        DumpBlocks { input: input, done: false }
    }
}

impl<R: BufRead> Iterator for DumpBlocks<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        collect_block(&mut self.input, &mut self.done, |line| line.trim() == "end", true)
    }
}

/// Gather lines until `boundary` matches. Empty blocks are never returned.
fn collect_block<R, F>(input: &mut R, done: &mut bool, boundary: F, keep_boundary: bool)
    -> Option<io::Result<String>>
    where R: BufRead, F: Fn(&str) -> bool {
    let mut block = String::new();
    while !*done {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Err(err) => {
                *done = true;
                return Some(Err(err));
            }
            Ok(0) => *done = true,
            Ok(_) => {
                if boundary(&line) {
                    if keep_boundary {
                        block.push_str(&line);
                    }
                    if !block.trim().is_empty() {
                        return Some(Ok(block));
                    }
                    block.clear();
                } else {
                    block.push_str(&line);
                }
            }
        }
    }
    if block.trim().is_empty() { None } else { Some(Ok(block)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn paragraphs() {
        let input = Cursor::new("one two\nthree\n\n\n  \nfour\n");
        let blocks: Vec<String> = Paragraphs::new(input).map(|b| b.unwrap()).collect();
        assert_eq!(blocks, vec!["one two\nthree\n", "four\n"]);
    }

    #[test]
    fn dump_blocks_keep_end() {
        let input = Cursor::new("sentence a\nend\n\nsentence b\nparse p\nend\ntrailing");
        let blocks: Vec<String> = DumpBlocks::new(input).map(|b| b.unwrap()).collect();
        assert_eq!(blocks, vec!["sentence a\nend\n", "\nsentence b\nparse p\nend\n", "trailing"]);
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert_eq!(Paragraphs::new(Cursor::new("\n\n")).count(), 0);
    }
}
