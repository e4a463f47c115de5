// cynical-prep: corpus preparation for cynical data selection.
//
// This is the library root. The corpus modules build the vocabulary and
// ratio tables, the selection modules talk to the external selection tool,
// and the pipeline ties one run together.

pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod selection;

pub use config::SelectionConfig;
pub use error::{Result, SelectionError};
pub use pipeline::run_selection;
pub use selection::jaded::{ResultMapping, SelectionRecord};
