pub mod dataset;
pub mod loader;
pub mod source;

pub use dataset::{Catalog, Dataset, Neighbour, RecommendationRow, RecommendationTable};
pub use loader::load_catalog;
pub use source::{CatalogSource, CsvSource};
