//! Selectable facet values that live in the catalog rather than in fixed tables.

mod list_facet_values;
pub use list_facet_values::{FacetCatalog, FacetValue, list_facet_catalog, list_genres, list_topics};
