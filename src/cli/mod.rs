pub mod commands;
pub mod context;
pub mod history;
pub mod ignore;
pub mod output;
pub mod progress;
pub mod root;
pub mod scan;
pub mod serve;
pub mod settings;

pub use commands::{Cli, Commands};
