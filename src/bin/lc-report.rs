//! Print the largest counters of one kind from a lexcount database
//!
//! Output is tab separated, the count first and then the fields of the entity, e.g. for pairs
//! `count<TAB>left<TAB>right`.

// argument parsing
#[macro_use] extern crate clap;
// logging
extern crate env_logger;
// lastly, this library
extern crate lexcount;

use clap::Arg;

use lexcount::entity::KINDS;
use lexcount::errors::*;
use lexcount::sqlite::SqliteStore;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}
pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .arg_from_usage("<database> 'SQLite file written by lc-observe'")
        .arg(Arg::from_usage("--kind=[KIND] 'which counters to list'")
            .possible_values(&KINDS)
            .default_value("word"))
        .arg(Arg::from_usage("--limit=[N] 'how many to list'")
            .default_value("20"))
        .get_matches();

    let limit = value_t!(args, "limit", usize).unwrap_or_else(|e| e.exit());
    let kind = args.value_of("kind").unwrap_or("word");
    let store = SqliteStore::open(args.value_of("database").unwrap())?;

    println!("# {} distinct {} counters", store.distinct(kind)?, kind);
    for (entity, count) in store.top(kind, limit)? {
        println!("{}\t{}", count, entity);
    }
    Ok(())
}
