//! CLI command handlers. Each command is in its own file.

mod download;
mod list;

pub use download::{run_download, DownloadArgs};
pub use list::run_list;
