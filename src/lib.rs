pub mod cli;
pub mod error;
pub mod ingestion;
pub mod search;
pub mod server;
pub mod state;
pub mod suggest;
