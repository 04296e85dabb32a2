use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    flights::{
        repo::FlightStore,
        repo_types::{Flight, FlightDraft},
    },
};

/// CRUD over the flight store, turning absent ids into `NotFound`.
#[derive(Clone)]
pub struct FlightService {
    store: Arc<dyn FlightStore>,
}

impl FlightService {
    pub fn new(store: Arc<dyn FlightStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: FlightDraft) -> AppResult<Flight> {
        let flight = self.store.insert(draft).await?;
        info!(id = flight.id, flight_number = %flight.flight_number, "flight created");
        Ok(flight)
    }

    pub async fn get_all(&self) -> AppResult<Vec<Flight>> {
        let flights = self.store.list().await?;
        debug!(count = flights.len(), "flights listed");
        Ok(flights)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Flight> {
        self.store.get(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn update(&self, id: i64, draft: FlightDraft) -> AppResult<Flight> {
        let flight = self.store.update(id, draft).await?.ok_or(AppError::NotFound)?;
        info!(id, "flight updated");
        Ok(flight)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound);
        }
        info!(id, "flight deleted");
        Ok(())
    }
}
