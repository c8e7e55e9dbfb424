pub mod allocation;
pub mod asset;
pub mod chart;

pub use allocation::{AdjustError, Allocation};
pub use asset::{AssetName, Rgba, SliceColor};
pub use chart::{ChartConfig, PieChart};
