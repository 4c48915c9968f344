//! Text renderers for the schema resources.
//!
//! - [`ddl`]: `CREATE TABLE` blocks for one table or the whole model
//! - [`relationships`]: foreign keys grouped by join kind
//! - [`listing`]: the compact table index

pub mod ddl;
pub mod listing;
pub mod relationships;
mod text;

pub use ddl::{column_line, full_schema, is_constraint_line, table_ddl, table_schema};
pub use listing::table_list;
pub use relationships::{chain_path, hierarchical_chains, summarize};
pub use text::{
    estimate_tokens, flatten, truncate, COLUMN_DESCRIPTION_LIMIT, TABLE_DESCRIPTION_LIMIT,
};

pub(crate) use text::write_title;
