use crate::{
    config::Config,
    database::entities::{Observation, Observations, StationRecord, Stations, observations, stations},
    server::Server,
};
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, Schema, Set};

/// Test server builder backed by an in-memory SQLite store
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        Self { config }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the test server and create the observation/station tables.
    /// Production schema is owned by the external store; table creation here
    /// exists only so tests have something to query.
    pub async fn build(self) -> Server {
        let server = Server::new(self.config).await.unwrap();
        setup_schema(server.database.connection()).await;
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bare in-memory database with the schema applied, for DAO-level tests
pub async fn test_database() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(&db).await;
    db
}

/// Create the two tables from the entity definitions
pub async fn setup_schema(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(Observations)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(Stations)))
        .await
        .unwrap();
}

pub async fn seed_observation(
    db: &DatabaseConnection,
    station: &str,
    date: &str,
    prcp: Option<f64>,
    tobs: f64,
) -> Observation {
    observations::ActiveModel {
        id: ActiveValue::NotSet,
        station: Set(station.to_string()),
        date: Set(date.to_string()),
        prcp: Set(prcp),
        tobs: Set(tobs),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_station(db: &DatabaseConnection, station: &str) -> StationRecord {
    stations::ActiveModel {
        id: ActiveValue::NotSet,
        station: Set(station.to_string()),
    }
    .insert(db)
    .await
    .unwrap()
}
