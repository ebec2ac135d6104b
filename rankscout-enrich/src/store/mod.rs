//! Input table reading, result persistence and read-side views

pub mod input_table;
pub mod result_store;
pub mod views;

pub use input_table::{InputRow, InputTable};
pub use result_store::ResultStore;
pub use views::{filter_hits, filter_recent, sort_by_rank, SortDirection};
