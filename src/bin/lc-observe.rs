//! Count words, pairs, relations and disjuncts in text piped to STDIN
//!
//! Text is split into blocks (paragraphs, WARC records, or parse dump sentences, see --format),
//! each block is parsed and every sentence counted into the given SQLite database. Counts add to
//! whatever is already there, so running again over new text picks up where the last run left
//! off. Several copies may count into one database at once, at the price of occasionally losing
//! an increment when two of them touch the same counter.
//!

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate lexcount;

use std::io;
use clap::Arg;

use lexcount::aggregate::Tally;
use lexcount::dump::DumpParser;
use lexcount::errors::*;
use lexcount::parser::{AnyParser, ParseQueue};
use lexcount::pipeline::{Pipeline, RateMonitor, SentenceSource};
use lexcount::sqlite::SqliteStore;
use lexcount::text::{DumpBlocks, Paragraphs};
use lexcount::warc::WarcReader;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .arg_from_usage("<database> 'SQLite file to count into (created if missing)'")
        .arg(Arg::from_usage("--format=[FORMAT] 'how STDIN is laid out'")
            .possible_values(&["text", "warc", "dump"])
            .default_value("text"))
        .arg(Arg::from_usage("--linkages=[N] 'random parses per sentence (text and warc only)'")
            .default_value("1"))
        .arg(Arg::from_usage("--seed=[SEED] 'random seed for the parses'")
            .default_value("0"))
        .arg(Arg::from_usage("--report-every=[N] 'sentences between progress reports'")
            .default_value("1000"))
        .get_matches();

    let linkages = value_t!(args, "linkages", usize).unwrap_or_else(|e| e.exit());
    let seed = value_t!(args, "seed", u64).unwrap_or_else(|e| e.exit());
    let every = value_t!(args, "report-every", u64).unwrap_or_else(|e| e.exit());
    let store = SqliteStore::open(args.value_of("database").unwrap())?;

    let stdin = io::stdin();
    let input = stdin.lock();
    let format = args.value_of("format").unwrap_or("text");
    info!("Reading {} from stdin, {} parses per sentence", format, linkages);

    let (tally, sentences) = match format {
        "dump" => {
            let pipeline = Pipeline::new(ParseQueue::new(DumpParser), store)
                .with_monitor(RateMonitor::new(every));
            feed(pipeline, DumpBlocks::new(input))?
        }
        "warc" => {
            let pipeline = Pipeline::new(ParseQueue::new(AnyParser::new(linkages, seed)), store)
                .with_monitor(RateMonitor::new(every));
            feed(pipeline, WarcReader::new(input).map(Ok))?
        }
        _ => {
            let pipeline = Pipeline::new(ParseQueue::new(AnyParser::new(linkages, seed)), store)
                .with_monitor(RateMonitor::new(every));
            feed(pipeline, Paragraphs::new(input))?
        }
    };

    println!("{} sentences, {} counts, {} skipped", sentences, tally.counted, tally.skipped);
    Ok(())
}

/// Observe every block; the first store error ends the run
fn feed<Q, I>(mut pipeline: Pipeline<Q, SqliteStore>, blocks: I) -> Result<(Tally, u64)>
    where Q: SentenceSource, I: Iterator<Item=io::Result<String>> {
    let mut tally = Tally::default();
    for block in blocks {
        tally += pipeline.observe_text(&block?)?;
    }
    info!("Touched {} counters", pipeline.counter().touched());
    Ok((tally, pipeline.sentences()))
}
