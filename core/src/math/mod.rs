pub mod angles;
pub mod rounding;

pub use angles::AngleHelper;
pub use rounding::RoundingHelper;
