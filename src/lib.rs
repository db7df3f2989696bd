//! Turns a search-bar string like `foo tag:a,b date:2016-2017 "exact phrase"`
//! into free text plus the keyword and range fields the caller recognizes.
//!
//! ```
//! use sqp::{parse, ParseOptions};
//!
//! let options = ParseOptions::new().with_keywords(["tag"]).with_ranges(["date"]);
//! let query = parse("foo tag:a,b date:2016-2017", &options);
//!
//! assert_eq!(query.keyword("tag").unwrap().as_slice(), ["a", "b"]);
//! assert_eq!(query.range("date").unwrap().to.as_deref(), Some("2017"));
//! ```

pub mod cli;
pub mod history;
pub mod options;
pub mod parser;
pub mod query;
pub mod tokenizer;

pub use options::ParseOptions;
pub use parser::parse;
pub use query::{Field, KeywordValue, Query, RangeValue, TextValue};
