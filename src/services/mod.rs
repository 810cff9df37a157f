//! Orchestration services

pub mod search;

pub use search::SearchService;
