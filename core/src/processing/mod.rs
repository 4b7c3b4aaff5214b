pub mod adsb;
pub mod alerts;
pub mod radar;
pub mod trajectory;

pub use adsb::AdsbModel;
pub use alerts::{AlertCategory, AlertDeriver, AlertTable, Verdict};
pub use radar::RadarModel;
pub use trajectory::{TrajectoryModel, TrajectoryPlan, TrajectorySynthesizer};
