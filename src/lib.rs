//! # csv_table
//!
//! `csv_table` loads comma-separated text into an in-memory, column-oriented
//! table of cell text. It supports:
//!
//! - Loading from a file path or any buffered reader
//! - Comment lines marked by a configurable leading character
//! - Row views by index and filtered row iteration
//! - Typed column access through the [`FromCell`] conversions
//! - Filtering into a new, independent table
//! - Aligned text rendering
//!
//! There is no quoting or escaping: every comma separates two fields.
//!
//! # Example
//!
//! ```rust
//! use csv_table::{FilterPredicate, FilterSet, LoadOptions, Table, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let csv = "# inventory\nitem,count,price\nbolt,120,0.10\nnut,80,0.05\ngear,3,12.50\n";
//!
//!     // Load CSV, skipping `#` lines
//!     let options = LoadOptions::new().with_comment('#');
//!     let table = Table::from_reader(csv.as_bytes(), &options)?;
//!     assert_eq!(table.row_count(), 3);
//!
//!     // Filter rows
//!     let cheap = FilterSet::new()
//!         .matching("price", FilterPredicate::LessThan(Value::Float(1.0)));
//!     let counts: Vec<u32> = table.column_as("count", &cheap)?;
//!     assert_eq!(counts, vec![120, 80]);
//!
//!     // Copy the matching rows into their own table
//!     let stocked = table.filter(&FilterSet::new().with("item", |v| v != "gear"))?;
//!     println!("{stocked}");
//!
//!     Ok(())
//! }
//! ```

mod helpers;
pub mod table;

pub use helpers::split::{DELIMITER, split_line};
pub use table::{
    FilterPredicate, LoadOptions, LoadSummary, PredicateError, Result, TableError, Value,
    column::Column,
    convert::{ConvertError, FromCell},
    csv_table::Table,
    filter::FilterSet,
    row::Row,
};
