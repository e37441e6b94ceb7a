pub mod filter;
pub mod metrics;
pub mod pagination;
pub mod recommendations;

pub use metrics::{normalize, RadarProfile, AXIS_LABELS};
pub use pagination::{clamp_page_index, page, Page};
pub use recommendations::{resolve, DEFAULT_MAX_RECOMMENDATIONS};
