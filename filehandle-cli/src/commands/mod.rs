//! CLI command implementations.
//!
//! One module per subcommand:
//! - `walk`: List a tree in pre-order
//! - `info`: Show metadata for a path
//! - `cat`: Print file contents
//! - `write`: Write or append text
//! - `cp`: Copy files and trees
//! - `mv`: Move or rename
//! - `rm`: Delete files and trees
//! - `clear`: Empty a directory or truncate a file
//! - `mkdir`: Create directories
//! - `config`: Read and edit JSON configuration files
//! - `completions`: Generate shell completion scripts

pub mod cat;
pub mod clear;
pub mod completions;
pub mod config;
pub mod cp;
pub mod info;
pub mod mkdir;
pub mod mv;
pub mod rm;
pub mod walk;
pub mod write;

pub use cat::CatCommand;
pub use clear::ClearCommand;
pub use completions::CompletionsCommand;
pub use config::{ConfigAction, ConfigCommand};
pub use cp::CpCommand;
pub use info::InfoCommand;
pub use mkdir::MkdirCommand;
pub use mv::MvCommand;
pub use rm::RmCommand;
pub use walk::WalkCommand;
pub use write::WriteCommand;
