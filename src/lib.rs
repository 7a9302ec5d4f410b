pub mod cli;
pub mod error;
pub mod git;
pub mod heat;
pub mod model;
pub mod util;

pub use error::{GridError, Result};
pub use heat::{level_of, render_html, render_terminal, GridAggregate, Scale};
pub use model::{CellKey, CommitRecord};
