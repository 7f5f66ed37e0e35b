use crate::database::entities::{observations, stations};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::{Months, NaiveDate};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One precipitation reading. `prcp` is passed through as stored; missing
/// readings stay null rather than being coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DatedPrecipitation {
    pub date: String,
    pub prcp: Option<f64>,
}

/// One temperature reading.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DatedTemperature {
    pub date: String,
    pub tobs: f64,
}

/// Temperature aggregates over a date selection. All three are null when no
/// observation matched.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct TemperatureStats {
    #[serde(rename = "max temp")]
    pub max_temp: Option<f64>,
    #[serde(rename = "min temp")]
    pub min_temp: Option<f64>,
    #[serde(rename = "avg temp")]
    pub avg_temp: Option<f64>,
}

/// Climate DAO for the read-only aggregate queries
pub struct ClimateDao {
    db: DatabaseConnection,
}

impl ClimateDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Most recent observation date in the store.
    pub async fn latest_date(&self) -> DatabaseResult<String> {
        let latest = observations::Entity::find()
            .order_by_desc(observations::Column::Date)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        latest.map(|obs| obs.date).ok_or(DatabaseError::NoData)
    }

    /// The 12-calendar-month window ending at the most recent observation
    /// date, as an inclusive `(start, end)` pair of ISO date strings.
    pub async fn lookback_window(&self) -> DatabaseResult<(String, String)> {
        let latest = self.latest_date().await?;
        let anchor = NaiveDate::parse_from_str(&latest, DATE_FORMAT).map_err(|e| {
            DatabaseError::Database(format!("unparseable observation date {latest:?}: {e}"))
        })?;
        let start = anchor
            .checked_sub_months(Months::new(12))
            .ok_or_else(|| DatabaseError::Database(format!("date out of range: {latest}")))?;

        Ok((start.format(DATE_FORMAT).to_string(), latest))
    }

    /// Precipitation readings for the trailing 12 months, ordered by date
    /// ascending.
    pub async fn precipitation_last_year(&self) -> DatabaseResult<Vec<DatedPrecipitation>> {
        let (start, end) = self.lookback_window().await?;

        observations::Entity::find()
            .select_only()
            .column(observations::Column::Date)
            .column(observations::Column::Prcp)
            .filter(observations::Column::Date.between(start, end))
            .order_by_asc(observations::Column::Date)
            .into_model()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// All station identifiers, in the store's natural order.
    pub async fn station_ids(&self) -> DatabaseResult<Vec<String>> {
        let rows = stations::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|s| s.station).collect())
    }

    /// Station with the highest observation count. Exact ties resolve to
    /// whichever row the store returns first ordering by count descending.
    pub async fn most_active_station(&self) -> DatabaseResult<String> {
        #[derive(FromQueryResult)]
        struct StationActivity {
            station: String,
        }

        let row: Option<StationActivity> = observations::Entity::find()
            .select_only()
            .column(observations::Column::Station)
            .group_by(observations::Column::Station)
            .order_by_desc(Expr::col(observations::Column::Id).count())
            .into_model()
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        row.map(|r| r.station).ok_or(DatabaseError::NoData)
    }

    /// Temperature readings for the most active station over the trailing
    /// 12 months, ordered by date ascending.
    pub async fn most_active_temperatures(&self) -> DatabaseResult<Vec<DatedTemperature>> {
        let station = self.most_active_station().await?;
        let (start, end) = self.lookback_window().await?;

        observations::Entity::find()
            .select_only()
            .column(observations::Column::Date)
            .column(observations::Column::Tobs)
            .filter(observations::Column::Station.eq(station))
            .filter(observations::Column::Date.between(start, end))
            .order_by_asc(observations::Column::Date)
            .into_model()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Temperature aggregates over observations dated exactly `date`.
    pub async fn temperature_stats_on(&self, date: &str) -> DatabaseResult<TemperatureStats> {
        self.temperature_stats(observations::Column::Date.eq(date))
            .await
    }

    /// Temperature aggregates over observations dated in `[start, end]`
    /// inclusive, compared as strings.
    pub async fn temperature_stats_between(
        &self,
        start: &str,
        end: &str,
    ) -> DatabaseResult<TemperatureStats> {
        self.temperature_stats(observations::Column::Date.between(start, end))
            .await
    }

    async fn temperature_stats(&self, filter: SimpleExpr) -> DatabaseResult<TemperatureStats> {
        let stats = observations::Entity::find()
            .select_only()
            .column_as(observations::Column::Tobs.max(), "max_temp")
            .column_as(observations::Column::Tobs.min(), "min_temp")
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col(observations::Column::Tobs))),
                "avg_temp",
            )
            .filter(filter)
            .into_model()
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        // An aggregate query with no GROUP BY always yields one row; a zero
        // match leaves all three columns null.
        stats.ok_or_else(|| DatabaseError::Database("aggregate query returned no row".to_string()))
    }
}
