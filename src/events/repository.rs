/**
 * Event Repository
 *
 * Durable storage boundary for event records, with the same backend split
 * as the credential store: parameterized PostgreSQL queries in production,
 * a guarded map when no database is configured and in tests.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

/// A stored event record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: Uuid,
    pub name: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub description: String,
    /// Path of the uploaded event image, if any
    pub image_ref: Option<String>,
    /// Id of the account that created the event
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub image_ref: Option<String>,
    pub creator_id: Uuid,
}

/// Replacement values for an existing event's fields.
///
/// The image and creator are not touched by updates.
#[derive(Debug, Clone, Deserialize)]
pub struct EventChanges {
    pub name: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub description: String,
}

/// Durable storage for event records.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event and return the stored record.
    async fn create(&self, event: NewEvent) -> Result<EventRecord, StoreError>;

    /// All events, oldest first.
    async fn list(&self) -> Result<Vec<EventRecord>, StoreError>;

    /// Fetch one event by id.
    async fn get(&self, id: Uuid) -> Result<Option<EventRecord>, StoreError>;

    /// Replace an event's fields.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no event has that id.
    async fn update(&self, id: Uuid, changes: EventChanges) -> Result<(), StoreError>;

    /// Delete an event. Deleting an id that does not exist is a no-op.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// PostgreSQL-backed event repository.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, event: NewEvent) -> Result<EventRecord, StoreError> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            INSERT INTO events (id, name, date_time, location, description, image_ref, creator_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, date_time, location, description, image_ref, creator_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.name)
        .bind(event.date_time)
        .bind(&event.location)
        .bind(&event.description)
        .bind(&event.image_ref)
        .bind(event.creator_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<EventRecord>, StoreError> {
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, name, date_time, location, description, image_ref, creator_id, created_at
            FROM events
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<EventRecord>, StoreError> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, name, date_time, location, description, image_ref, creator_id, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $1, date_time = $2, location = $3, description = $4
            WHERE id = $5
            "#,
        )
        .bind(&changes.name)
        .bind(changes.date_time)
        .bind(&changes.location)
        .bind(&changes.description)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory event repository.
#[derive(Default)]
pub struct MemoryEventRepository {
    events: RwLock<HashMap<Uuid, EventRecord>>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn create(&self, event: NewEvent) -> Result<EventRecord, StoreError> {
        let record = EventRecord {
            id: Uuid::new_v4(),
            name: event.name,
            date_time: event.date_time,
            location: event.location,
            description: event.description,
            image_ref: event.image_ref,
            creator_id: event.creator_id,
            created_at: Utc::now(),
        };
        self.events.write().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<EventRecord>, StoreError> {
        let mut records: Vec<EventRecord> =
            self.events.read().unwrap().values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<EventRecord>, StoreError> {
        Ok(self.events.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> Result<(), StoreError> {
        let mut events = self.events.write().unwrap();
        let record = events.get_mut(&id).ok_or(StoreError::NotFound)?;
        record.name = changes.name;
        record.date_time = changes.date_time;
        record.location = changes.location;
        record.description = changes.description;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.events.write().unwrap().remove(&id);
        Ok(())
    }
}
