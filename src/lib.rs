//! Walk-forward (sliding-window) cross-validation splits for time-ordered tables.
//!
//! ```no_run
//! use slidecv::splitters::{InMemoryTable, SlideWindowSplitter};
//!
//! let table = InMemoryTable::new("t", (0..100).collect::<Vec<i64>>());
//! let splitter = SlideWindowSplitter::new("t", 3, 0.8)?;
//! for split in splitter.split(&table)? {
//!     let (train_ids, test_ids) = split?.into_pair();
//!     println!("{} train rows, {} test rows", train_ids.len(), test_ids.len());
//! }
//! # Ok::<(), slidecv::error::SlidecvError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod progress;
pub mod splitters;

pub use error::{Result, SlidecvError};
pub use splitters::{DataSplit, SlideWindowSplitter, SplitConfig, TimeSeriesTable, Window};
