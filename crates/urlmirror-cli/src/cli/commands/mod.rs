//! CLI command handlers. Each command is in its own file.

mod canon;
mod convert;
mod equal;
mod links;
mod local;

pub use canon::run_canon;
pub use convert::run_convert;
pub use equal::run_equal;
pub use links::run_links;
pub use local::run_local;
