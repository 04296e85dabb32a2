use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::flights::repo_types::{Flight, FlightDraft, FlightRow};

/// Persistence for flights. Ids are assigned by the store and never reused.
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn insert(&self, draft: FlightDraft) -> anyhow::Result<Flight>;
    async fn list(&self) -> anyhow::Result<Vec<Flight>>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<Flight>>;
    /// Returns `None` when no flight has this id.
    async fn update(&self, id: i64, draft: FlightDraft) -> anyhow::Result<Option<Flight>>;
    /// Returns `false` when no flight has this id.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgFlightStore {
    db: PgPool,
}

impl PgFlightStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FlightStore for PgFlightStore {
    async fn insert(&self, draft: FlightDraft) -> anyhow::Result<Flight> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            INSERT INTO flights (flight_number, departure_date, departure_location,
                                 destination_location, aircraft_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, flight_number, departure_date, departure_location,
                      destination_location, aircraft_type
            "#,
        )
        .bind(&draft.flight_number)
        .bind(draft.departure_date)
        .bind(&draft.departure_location)
        .bind(&draft.destination_location)
        .bind(draft.aircraft_type.as_str())
        .fetch_one(&self.db)
        .await
        .context("insert flight")?;
        row.try_into()
    }

    async fn list(&self) -> anyhow::Result<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT id, flight_number, departure_date, departure_location,
                   destination_location, aircraft_type
            FROM flights
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list flights")?;
        rows.into_iter().map(Flight::try_from).collect()
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Flight>> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT id, flight_number, departure_date, departure_location,
                   destination_location, aircraft_type
            FROM flights
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("get flight {}", id))?;
        row.map(Flight::try_from).transpose()
    }

    async fn update(&self, id: i64, draft: FlightDraft) -> anyhow::Result<Option<Flight>> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            UPDATE flights
               SET flight_number = $2,
                   departure_date = $3,
                   departure_location = $4,
                   destination_location = $5,
                   aircraft_type = $6
             WHERE id = $1
            RETURNING id, flight_number, departure_date, departure_location,
                      destination_location, aircraft_type
            "#,
        )
        .bind(id)
        .bind(&draft.flight_number)
        .bind(draft.departure_date)
        .bind(&draft.departure_location)
        .bind(&draft.destination_location)
        .bind(draft.aircraft_type.as_str())
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("update flight {}", id))?;
        row.map(Flight::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM flights WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete flight {}", id))?;
        Ok(res.rows_affected() > 0)
    }
}

/// Process-local flight store with auto-increment ids, iterated in id order.
#[derive(Default)]
pub struct InMemoryFlightStore {
    inner: RwLock<MemFlights>,
}

#[derive(Default)]
struct MemFlights {
    last_id: i64,
    rows: BTreeMap<i64, Flight>,
}

impl InMemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightStore for InMemoryFlightStore {
    async fn insert(&self, draft: FlightDraft) -> anyhow::Result<Flight> {
        let mut guard = self.inner.write().await;
        guard.last_id += 1;
        let flight = draft.into_flight(guard.last_id);
        guard.rows.insert(flight.id, flight.clone());
        Ok(flight)
    }

    async fn list(&self) -> anyhow::Result<Vec<Flight>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Flight>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, draft: FlightDraft) -> anyhow::Result<Option<Flight>> {
        let mut guard = self.inner.write().await;
        let Some(slot) = guard.rows.get_mut(&id) else {
            return Ok(None);
        };
        *slot = draft.into_flight(id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
