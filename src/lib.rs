pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod probe;
pub mod queue;
pub mod recon;
pub mod subdomains;
pub mod utils;
pub mod wordlist;
