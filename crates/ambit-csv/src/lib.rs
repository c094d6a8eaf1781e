//! Flat CSV adapter: engine tables out, effect records back in.
//!
//! The written form mirrors the condition-expansion convention of the flat
//! tables, so a table written here reads back as the effect records it was
//! tabulated from.

mod read;
mod write;

pub use read::{read_effects, read_effects_from};
pub use write::{write_table, write_table_to};
