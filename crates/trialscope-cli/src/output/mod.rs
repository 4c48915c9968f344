//! Output formatting modules.

pub mod json;
pub mod table;

pub use json::{format_descriptors_json, format_resources_json};
pub use table::format_resource_table;
