//! # Uplink Search
//!
//! Query delegation over an always-fresh index.
//!
//! [`SearchDelegate`] re-runs the indexing pipeline before every query, so
//! answers reflect the tree as of the call, then issues one retrieval
//! request carrying the project's full recorded blob set.

mod delegate;
mod error;

pub use delegate::{SearchDelegate, NO_RESULTS_MESSAGE};
pub use error::{Result, SearchError};
