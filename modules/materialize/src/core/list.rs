//! Random-access list materializers.
//!
//! The positional analog of the iterator protocol: elements are materialized by index instead of
//! by pulling a cursor. Needle-based combinators accept a list materializer as their secondary
//! source.

/// Vec-backed list materializer.
mod elements_to_list_materializer;
/// List materializer trait.
mod list_materializer;

pub use elements_to_list_materializer::ElementsToListMaterializer;
pub use list_materializer::{ListMaterializer, SharedListMaterializer};
