//! Reference resource providers: glossary, column profiles and query patterns.
//!
//! Each provider borrows the collection it formats and knows nothing about
//! URIs. Availability of the collection is the resolver's concern.

mod glossary;
mod patterns;
mod profiles;

pub use glossary::GlossaryProvider;
pub use patterns::PatternProvider;
pub use profiles::ProfileProvider;
