//! Writers for the persisted summary.
//!
//! The summary is a two-column sheet: indicator names down column A and their
//! values in column B, headed by the entity label. It is written once, after
//! every input file has been processed.

mod error;
mod path;
mod writer;

pub use error::{OutputError, Result};
pub use path::{DEFAULT_OUTPUT_DIR_NAME, OutputFormat, default_output_path, summary_file_name};
pub use writer::write_summary;
