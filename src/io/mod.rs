//! File adapters: CSV export and portfolio import.

pub mod export;
pub mod import;
