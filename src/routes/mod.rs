pub mod climate;
pub mod health;

pub use climate::create_climate_routes;
pub use health::create_health_routes;
