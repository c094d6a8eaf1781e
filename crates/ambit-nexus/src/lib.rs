//! Attribute-store adapter for the hierarchical dataset export.
//!
//! This crate bridges export hierarchy trees and hierarchical attribute
//! containers of the HDF5 family: nested groups carrying string attributes,
//! named per-point arrays and scalar fields. The container library sits
//! behind the [`AttributeStore`] trait; [`MemoryStore`] is the deterministic
//! in-memory implementation used by tests and dry-run exports.
//!
//! # Features
//!
//! - Depth-first tree writer tagging every group with its `NX_class`
//! - `signal` and `axes` attributes derived from each dataset at write time
//! - Identity read-back of substances, entries and their study metadata
//! - Sorted-path in-memory store for deterministic layout dumps
//!
//! # Example
//!
//! ```
//! use ambit_model::{DataArray, DatasetNode, GroupNode, NodeClass};
//! use ambit_nexus::{AttributeStore, MemoryStore, write_tree};
//!
//! let mut entry = GroupNode::new("entry_demo", NodeClass::Entry).unwrap();
//! let mut dataset = DatasetNode::new("0_LC50");
//! dataset.response = Some(DataArray::floats("LC50", Some("mg/L".into()), vec![1.0, 2.0]));
//! dataset.axes.push(DataArray::floats(
//!     "CONCENTRATION",
//!     Some("mg/L".into()),
//!     vec![10.0, 20.0],
//! ));
//! entry.insert_dataset(dataset).unwrap();
//!
//! let mut store = MemoryStore::new();
//! write_tree(&mut store, &entry, "/").unwrap();
//!
//! let signal = store.attr("/entry_demo/0_LC50", "signal").unwrap();
//! assert_eq!(signal.as_deref(), Some("LC50"));
//! ```

mod error;
mod memory;
mod reader;
mod store;
mod writer;

// Re-export error types
pub use error::{Result, StoreError};

// Re-export the store interface and its in-memory implementation
pub use memory::MemoryStore;
pub use store::{AttributeStore, StoredKind, child_path};

// Re-export writer and reader functionality
pub use reader::read_substances;
pub use writer::{AXES_ATTR, NX_CLASS_ATTR, SIGNAL_ATTR, write_substances, write_tree};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
