//! # Session Context
//!
//! Everything one user's interaction owns. Handlers receive the context
//! explicitly; nothing here is global.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::SessionResult;
use super::input::InputBounds;
use crate::ledger::{Appended, Ledger, PredictionRecord, Timestamp};
use crate::model::ModelPort;
use crate::observability::Event;

#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    ledger: Ledger,
}

impl SessionContext {
    pub fn new(id: Uuid, ledger: Ledger) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            last_seen: now,
            ledger,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Mark the session as active
    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Most recent prediction, used as the chart marker
    pub fn last_prediction(&self) -> Option<&PredictionRecord> {
        self.ledger.latest()
    }

    /// Validate, predict and record at the current time
    pub fn predict(
        &mut self,
        port: &ModelPort,
        bounds: &InputBounds,
        experience: f64,
    ) -> SessionResult<Appended> {
        self.predict_at(port, bounds, experience, Timestamp::now())
    }

    /// Validate, predict and record
    ///
    /// The ledger is only touched once the model has produced a value.
    pub fn predict_at(
        &mut self,
        port: &ModelPort,
        bounds: &InputBounds,
        experience: f64,
        now: Timestamp,
    ) -> SessionResult<Appended> {
        self.touch();
        let input = bounds.validate(experience)?;

        let output = port.predict(input.value()).map_err(|e| {
            tracing::warn!(
                event = %Event::PredictionFailed,
                session = %self.id,
                experience = input.value(),
                error = %e,
                "prediction failed"
            );
            e
        })?;

        let appended = self.ledger.append(input.value(), output, now);
        tracing::info!(
            event = %Event::PredictionRecorded,
            session = %self.id,
            experience = input.value(),
            prediction = output,
            history = self.ledger.len(),
            persisted = appended.is_persisted(),
            "prediction recorded"
        );

        Ok(appended)
    }
}
