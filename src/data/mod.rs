pub mod connectors;
pub mod frame;
pub mod memory;

pub use connectors::{CsvConnector, DataValidator};
pub use frame::{column_values, shuffle_rows, take_split, ColumnValue, FrameSplit};
pub use memory::{reduce_mem_usage, Conversion, MemoryReduction};
