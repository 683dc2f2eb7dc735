//! `PostgreSQL` capability repository implementation.

use super::{
    models::{CapabilityChangeset, CapabilityRow, NewCapabilityRow},
    schema::capabilities,
};
use crate::capability::{
    domain::{
        Capability, CapabilityId, CapabilityName, CapabilityQuery, CapabilityUpdate,
        PersistedCapabilityData, Priority,
    },
    ports::{CapabilityRepository, CapabilityRepositoryError, CapabilityRepositoryResult},
};
use crate::common::Metadata;
use crate::db::PgPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed capability repository.
#[derive(Debug, Clone)]
pub struct PostgresCapabilityRepository {
    pool: PgPool,
}

impl PostgresCapabilityRepository {
    /// Creates a repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CapabilityRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CapabilityRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(CapabilityRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CapabilityRepositoryError::persistence)?
    }
}

#[async_trait]
impl CapabilityRepository for PostgresCapabilityRepository {
    async fn create(&self, capability: &Capability) -> CapabilityRepositoryResult<()> {
        let capability_id = capability.id();
        let capability_name = capability.name().clone();
        let new_row = to_new_row(capability);

        self.run_blocking(move |connection| {
            diesel::insert_into(capabilities::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_write_error(err, capability_id, capability_name))?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        id: CapabilityId,
        update: &CapabilityUpdate,
        at: DateTime<Utc>,
    ) -> CapabilityRepositoryResult<Capability> {
        let changeset = CapabilityChangeset {
            name: update.name.as_ref().map(|name| name.as_str().to_owned()),
            description: update.description.clone(),
            category: update.category.clone(),
            priority: update.priority.map(|priority| i16::from(priority.value())),
            metadata: update.metadata.clone().map(serde_json::Value::Object),
            updated_at: at,
        };
        let new_name = update.name.clone();

        self.run_blocking(move |connection| {
            let target = capabilities::table.filter(capabilities::id.eq(id.into_inner()));
            let row = diesel::update(target)
                .set(&changeset)
                .returning(CapabilityRow::as_returning())
                .get_result::<CapabilityRow>(connection)
                .optional()
                .map_err(|err| match new_name {
                    Some(name) => map_write_error(err, id, name),
                    None => CapabilityRepositoryError::persistence(err),
                })?;
            row.map(row_to_capability)
                .transpose()?
                .ok_or(CapabilityRepositoryError::NotFound(id))
        })
        .await
    }

    async fn find_by_id(&self, id: CapabilityId) -> CapabilityRepositoryResult<Option<Capability>> {
        self.run_blocking(move |connection| {
            let row = capabilities::table
                .filter(capabilities::id.eq(id.into_inner()))
                .select(CapabilityRow::as_select())
                .first::<CapabilityRow>(connection)
                .optional()
                .map_err(CapabilityRepositoryError::persistence)?;
            row.map(row_to_capability).transpose()
        })
        .await
    }

    async fn find_by_names(
        &self,
        names: &[CapabilityName],
    ) -> CapabilityRepositoryResult<Vec<Capability>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let name_strs: Vec<String> = names.iter().map(|name| name.as_str().to_owned()).collect();
        self.run_blocking(move |connection| {
            let rows = capabilities::table
                .filter(capabilities::name.eq_any(&name_strs))
                .order(capabilities::name.asc())
                .select(CapabilityRow::as_select())
                .load::<CapabilityRow>(connection)
                .map_err(CapabilityRepositoryError::persistence)?;
            rows.into_iter().map(row_to_capability).collect()
        })
        .await
    }

    async fn list(&self, query: &CapabilityQuery) -> CapabilityRepositoryResult<Vec<Capability>> {
        let category = query.category.clone();
        let window = query
            .page
            .map(|page| {
                let offset = i64::try_from(page.offset())?;
                let limit = i64::try_from(page.limit())?;
                Ok::<_, std::num::TryFromIntError>((offset, limit))
            })
            .transpose()
            .map_err(CapabilityRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let mut statement = capabilities::table
                .select(CapabilityRow::as_select())
                .order(capabilities::name.asc())
                .into_boxed();
            if let Some(category_value) = category {
                statement = statement.filter(capabilities::category.eq(category_value));
            }
            if let Some((offset, limit)) = window {
                statement = statement.offset(offset).limit(limit);
            }
            let rows = statement
                .load::<CapabilityRow>(connection)
                .map_err(CapabilityRepositoryError::persistence)?;
            rows.into_iter().map(row_to_capability).collect()
        })
        .await
    }

    async fn delete(&self, id: CapabilityId) -> CapabilityRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(capabilities::table.filter(capabilities::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(CapabilityRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(CapabilityRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn map_write_error(
    err: DieselError,
    id: CapabilityId,
    name: CapabilityName,
) -> CapabilityRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
            if info.constraint_name() == Some("idx_capabilities_name") {
                CapabilityRepositoryError::DuplicateCapabilityName(name)
            } else {
                CapabilityRepositoryError::DuplicateCapability(id)
            }
        }
        _ => CapabilityRepositoryError::persistence(err),
    }
}

fn to_new_row(capability: &Capability) -> NewCapabilityRow {
    NewCapabilityRow {
        id: capability.id().into_inner(),
        name: capability.name().as_str().to_owned(),
        description: capability.description().map(str::to_owned),
        category: capability.category().map(str::to_owned),
        priority: i16::from(capability.priority().value()),
        metadata: serde_json::Value::Object(capability.metadata().clone()),
        created_at: capability.created_at(),
        updated_at: capability.updated_at(),
    }
}

fn row_to_capability(row: CapabilityRow) -> CapabilityRepositoryResult<Capability> {
    let CapabilityRow {
        id,
        name,
        description,
        category,
        priority,
        metadata,
        created_at,
        updated_at,
    } = row;

    let parsed_name =
        CapabilityName::new(name).map_err(CapabilityRepositoryError::invalid_persisted_data)?;
    let parsed_priority = Priority::new(i64::from(priority))
        .map_err(CapabilityRepositoryError::invalid_persisted_data)?;
    let parsed_metadata: Metadata = serde_json::from_value(metadata)
        .map_err(CapabilityRepositoryError::invalid_persisted_data)?;

    Ok(Capability::from_persisted(PersistedCapabilityData {
        id: CapabilityId::from_uuid(id),
        name: parsed_name,
        description,
        category,
        priority: parsed_priority,
        metadata: parsed_metadata,
        created_at,
        updated_at,
    }))
}
