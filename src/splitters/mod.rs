pub mod base;
pub mod planner;
pub mod sliding;
pub mod types;

pub use base::{InMemoryTable, TimeSeriesTable};
pub use planner::WindowPlan;
pub use sliding::{SlideWindowSplitter, SplitIter};
pub use types::{
    DataSplit, RowId, SplitBounds, SplitConfig, Window, DEFAULT_N_SPLITS, DEFAULT_TRAIN_RATIO,
    RATIO_TOLERANCE,
};
