pub mod climate;

pub use climate::{ClimateDao, DatedPrecipitation, DatedTemperature, TemperatureStats};
