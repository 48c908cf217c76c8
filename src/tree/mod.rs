//! Structural operations over a task forest.
//!
//! - [`locate`]: find a node by id, pre-order, first match wins.
//! - [`filter`]: ancestry-preserving pruning by a per-node predicate.

pub mod filter;
pub mod locate;

pub use filter::{filter_by_status, filter_forest};
pub use locate::{find, find_mut, locate_path, Located, LocatedMut};
