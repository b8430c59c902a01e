pub mod environment;
pub mod registry;
pub mod resolve;
pub mod value;

pub use environment::{Environment, Paths};
pub use registry::defaults;
pub use resolve::{deep_merge, missing_leaves, resolve, ChartOptions};
pub use value::{ConfigTree, ConfigValue, Section};
