pub mod observations;
pub mod stations;

pub use observations::Entity as Observations;
pub use stations::Entity as Stations;

// Type aliases
pub type Observation = observations::Model;
pub type StationRecord = stations::Model;
