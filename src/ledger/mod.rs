//! Ledger module containing the approval committee and balance processing

pub mod approval;
pub mod core;

pub use approval::*;
pub use core::*;
