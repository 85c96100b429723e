pub mod parser;
pub mod sort;
pub mod variants;

pub use parser::{QueryPlan, parse};
pub use sort::{MAX_LIMIT, SortMode, clamp_limit, clamp_page};
pub use variants::generate;
