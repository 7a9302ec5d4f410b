pub mod aggregate;
pub mod exec;
pub mod fetch;
pub mod html;
pub mod output;
pub mod scale;
pub mod summary;

pub use aggregate::GridAggregate;
pub use exec::exec;
pub use fetch::{fetch_grid, fetch_records, resolve_repositories};
pub use html::{render_html, write_html};
pub use output::{render_json, render_terminal, NO_DATA};
pub use scale::{level_of, Scale};
pub use summary::summarize;
