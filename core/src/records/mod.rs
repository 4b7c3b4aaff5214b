pub mod adsb;
pub mod ground;
pub mod radar;

pub use adsb::{AdsbAlert, AdsbMessage};
pub use ground::GroundRecord;
pub use radar::{RadarAlert, RadarTrack};
