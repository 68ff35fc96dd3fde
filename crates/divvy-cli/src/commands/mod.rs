//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init command and shared utilities (open_db)
//! - `parse` - Extraction document normalization
//! - `split` - Breakdown computation and saving
//! - `history` - Saved breakdown listing and deletion

pub mod core;
pub mod history;
pub mod parse;
pub mod split;

// Re-export command functions for main.rs
pub use core::*;
pub use history::*;
pub use parse::*;
pub use split::*;
