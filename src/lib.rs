pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod index;
pub mod models;
pub mod report;
pub mod stats;
pub mod storage;

pub use app::{run, RunPlan, RunSummary};
pub use client::{GithubClient, TrafficSource};
pub use config::{Cli, Config};
pub use errors::TrafficError;
pub use index::{build_index, SeriesIndex};
pub use stats::aggregate;
