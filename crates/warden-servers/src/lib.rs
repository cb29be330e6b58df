//! Server listing, power control, console and backups for the panel API.
//!
//! These are thin typed wrappers; each call is one request and nothing is cached.

pub mod backups;
pub mod console;
pub mod error;
pub mod servers;
pub mod types;

pub use backups::Backups;
pub use console::Console;
pub use error::{Result, ServerError};
pub use servers::Servers;
pub use types::{Backup, ConsoleLine, ServerInfo, ServerStatus};
