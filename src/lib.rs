//! # Credential Ledger
//!
//! A deterministic fungible-token ledger whose minting is gated by a fixed
//! committee of three approvers, paired with a credential registry that
//! charges a fee in ledger units to mark stored hashes verified.
//!
//! ## Features
//!
//! - **Committee minting**: unanimous approval rounds that fill, fire and reset
//! - **Native deposits**: fixed-rate conversion of native currency into tokens
//! - **Delegated spending**: allowance-based `transfer_from`
//! - **Credential registry**: `Unknown -> Stored -> Verified` with fee collection
//! - **Ordered notifications**: append-only event logs per component
//! - **Storage abstraction**: backend-agnostic, all-or-nothing commits
//!
//! ## Quick Start
//!
//! ```rust
//! use credential_ledger::utils::MemoryStorage;
//! use credential_ledger::{Address, Ledger, ONE_TOKEN};
//!
//! let approvers = vec![
//!     Address::from_label("approver-1"),
//!     Address::from_label("approver-2"),
//!     Address::from_label("approver-3"),
//! ];
//! let ledger = Ledger::new(
//!     MemoryStorage::new(),
//!     Address::from_label("ledger"),
//!     "Group 8 Token",
//!     "G8TK",
//!     approvers,
//! )
//! .unwrap();
//! assert_eq!(ledger.decimals(), 18);
//! assert_eq!(ONE_TOKEN, 10u128.pow(18));
//! ```

pub mod config;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod traits;
pub mod types;
pub mod units;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use events::*;
pub use ledger::*;
pub use registry::*;
pub use traits::*;
pub use types::*;
pub use units::*;
