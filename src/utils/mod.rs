pub mod aggregation;

pub use aggregation::{resample_daily_mean, BoxStats};
