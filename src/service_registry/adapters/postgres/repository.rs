//! `PostgreSQL` liveness store implementation.
//!
//! Visibility is enforced in SQL with `expires_at > $now`, so expired rows
//! are invisible even before the reaper deletes them.

use super::{
    models::{NewServiceRow, ServiceChangeset, ServiceRow},
    schema::services,
};
use crate::common::{Endpoint, Metadata};
use crate::db::PgPool;
use crate::service_registry::{
    domain::{
        HealthSnapshot, PersistedServiceData, ServiceId, ServiceName, ServiceRecord,
        ServiceUpdate, Ttl,
    },
    ports::{LivenessStore, LivenessStoreError, LivenessStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed liveness store.
#[derive(Debug, Clone)]
pub struct PostgresLivenessStore {
    pool: PgPool,
}

impl PostgresLivenessStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> LivenessStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LivenessStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(LivenessStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(LivenessStoreError::persistence)?
    }
}

#[async_trait]
impl LivenessStore for PostgresLivenessStore {
    async fn insert(&self, record: &ServiceRecord) -> LivenessStoreResult<()> {
        let service_id = record.id();
        let new_row = to_new_row(record)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(services::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        LivenessStoreError::DuplicateService(service_id)
                    }
                    _ => LivenessStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_live(
        &self,
        id: ServiceId,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<Option<ServiceRecord>> {
        self.run_blocking(move |connection| {
            let row = services::table
                .filter(services::id.eq(id.into_inner()))
                .filter(services::expires_at.gt(now))
                .select(ServiceRow::as_select())
                .first::<ServiceRow>(connection)
                .optional()
                .map_err(LivenessStoreError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn touch(
        &self,
        id: ServiceId,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord> {
        self.run_blocking(move |connection| {
            let row = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let current = services::table
                        .filter(services::id.eq(id.into_inner()))
                        .filter(services::expires_at.gt(now))
                        .select(ServiceRow::as_select())
                        .for_update()
                        .first::<ServiceRow>(tx)
                        .optional()?;
                    let Some(current) = current else {
                        return Ok(None);
                    };
                    let expires_at = at + TimeDelta::seconds(i64::from(current.ttl_seconds));
                    diesel::update(services::table.filter(services::id.eq(current.id)))
                        .set((
                            services::last_heartbeat_at.eq(at),
                            services::expires_at.eq(expires_at),
                        ))
                        .returning(ServiceRow::as_returning())
                        .get_result::<ServiceRow>(tx)
                        .map(Some)
                })
                .map_err(LivenessStoreError::persistence)?;
            row.map(row_to_record)
                .transpose()?
                .ok_or(LivenessStoreError::NotFound(id))
        })
        .await
    }

    async fn update_live(
        &self,
        id: ServiceId,
        update: &ServiceUpdate,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord> {
        let changeset = ServiceChangeset {
            name: update.name.as_ref().map(|name| name.as_str().to_owned()),
            url: update.url.as_ref().map(|url| url.as_str().to_owned()),
            health_check_url: update
                .health_check_url
                .as_ref()
                .map(|url| url.as_ref().map(|value| value.as_str().to_owned())),
            metadata: update.metadata.clone().map(serde_json::Value::Object),
            updated_at: at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::update(
                services::table
                    .filter(services::id.eq(id.into_inner()))
                    .filter(services::expires_at.gt(now)),
            )
            .set(&changeset)
            .returning(ServiceRow::as_returning())
            .get_result::<ServiceRow>(connection)
            .optional()
            .map_err(LivenessStoreError::persistence)?;
            row.map(row_to_record)
                .transpose()?
                .ok_or(LivenessStoreError::NotFound(id))
        })
        .await
    }

    async fn record_health(
        &self,
        id: ServiceId,
        snapshot: &HealthSnapshot,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<()> {
        let health_val = serde_json::to_value(snapshot).map_err(LivenessStoreError::persistence)?;

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                services::table
                    .filter(services::id.eq(id.into_inner()))
                    .filter(services::expires_at.gt(now)),
            )
            .set(services::last_health.eq(Some(health_val)))
            .execute(connection)
            .map_err(LivenessStoreError::persistence)?;

            if updated_count == 0 {
                return Err(LivenessStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn remove_live(&self, id: ServiceId, now: DateTime<Utc>) -> LivenessStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count = diesel::delete(
                services::table
                    .filter(services::id.eq(id.into_inner()))
                    .filter(services::expires_at.gt(now)),
            )
            .execute(connection)
            .map_err(LivenessStoreError::persistence)?;

            if deleted_count == 0 {
                return Err(LivenessStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn scan_live(&self, now: DateTime<Utc>) -> LivenessStoreResult<Vec<ServiceRecord>> {
        self.run_blocking(move |connection| {
            let rows = services::table
                .filter(services::expires_at.gt(now))
                .order((services::registered_at.asc(), services::id.asc()))
                .select(ServiceRow::as_select())
                .load::<ServiceRow>(connection)
                .map_err(LivenessStoreError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn scan_live_by_name(
        &self,
        name: &ServiceName,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<Vec<ServiceRecord>> {
        let name_str = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = services::table
                .filter(services::name.eq(&name_str))
                .filter(services::expires_at.gt(now))
                .order((services::registered_at.asc(), services::id.asc()))
                .select(ServiceRow::as_select())
                .load::<ServiceRow>(connection)
                .map_err(LivenessStoreError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> LivenessStoreResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(services::table.filter(services::expires_at.le(now)))
                .execute(connection)
                .map_err(LivenessStoreError::persistence)
        })
        .await
    }
}

fn to_new_row(record: &ServiceRecord) -> LivenessStoreResult<NewServiceRow> {
    let ttl_seconds =
        i32::try_from(record.ttl().as_secs()).map_err(LivenessStoreError::persistence)?;

    Ok(NewServiceRow {
        id: record.id().into_inner(),
        name: record.name().as_str().to_owned(),
        url: record.url().as_str().to_owned(),
        health_check_url: record.health_check_url().map(|url| url.as_str().to_owned()),
        metadata: serde_json::Value::Object(record.metadata().clone()),
        ttl_seconds,
        registered_at: record.registered_at(),
        last_heartbeat_at: record.last_heartbeat_at(),
        updated_at: record.updated_at(),
        expires_at: record.expires_at(),
    })
}

fn row_to_record(row: ServiceRow) -> LivenessStoreResult<ServiceRecord> {
    let ServiceRow {
        id,
        name,
        url,
        health_check_url,
        metadata,
        ttl_seconds,
        registered_at,
        last_heartbeat_at,
        updated_at,
        expires_at: _,
        last_health,
    } = row;

    let parsed_name = ServiceName::new(name).map_err(LivenessStoreError::invalid_persisted_data)?;
    let parsed_url = Endpoint::new(url).map_err(LivenessStoreError::invalid_persisted_data)?;
    let parsed_health_url = health_check_url
        .map(Endpoint::new)
        .transpose()
        .map_err(LivenessStoreError::invalid_persisted_data)?;
    let parsed_metadata: Metadata =
        serde_json::from_value(metadata).map_err(LivenessStoreError::invalid_persisted_data)?;
    let parsed_ttl = u64::try_from(ttl_seconds)
        .map_err(LivenessStoreError::invalid_persisted_data)
        .and_then(|secs| Ttl::from_secs(secs).map_err(LivenessStoreError::invalid_persisted_data))?;
    let parsed_health: Option<HealthSnapshot> = last_health
        .map(serde_json::from_value)
        .transpose()
        .map_err(LivenessStoreError::invalid_persisted_data)?;

    Ok(ServiceRecord::from_persisted(PersistedServiceData {
        id: ServiceId::from_uuid(id),
        name: parsed_name,
        url: parsed_url,
        health_check_url: parsed_health_url,
        metadata: parsed_metadata,
        ttl: parsed_ttl,
        registered_at,
        last_heartbeat_at,
        updated_at,
        last_health: parsed_health,
    }))
}
