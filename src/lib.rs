//! Running occurrence counts over parsed text
//!
//! Parsed sentences go in; words, word pairs and their distances, typed relations and
//! per-word disjuncts come out as counters in a persistent store. Counts accumulate across runs.
//! The binaries wire a parser and a SQLite store to this library and probably are what you want.


#[macro_use] extern crate log;
extern crate nom;
extern crate farmhash;
extern crate rand;
extern crate rusqlite;
extern crate unicode_segmentation;
#[cfg(test)] extern crate tempfile;
pub mod errors;
pub mod farm;
pub mod sentence;
pub mod entity;
pub mod store;
pub mod sqlite;
pub mod counter;
pub mod aggregate;
pub mod pipeline;
pub mod parser;
pub mod dump;
pub mod text;
pub mod warc;
