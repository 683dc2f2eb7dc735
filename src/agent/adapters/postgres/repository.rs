//! `PostgreSQL` agent repository implementation.

use super::{
    models::{AgentChangeset, AgentRow, NewAgentRow},
    schema::agents,
};
use crate::agent::{
    domain::{
        Agent, AgentId, AgentName, AgentQuery, AgentStatus, AgentUpdate, AgentVersion,
        CapabilitySet, PersistedAgentData, SnapshotScope,
    },
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};
use crate::capability::domain::CapabilityName;
use crate::common::{Endpoint, Metadata};
use crate::db::PgPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed agent repository.
#[derive(Debug, Clone)]
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    /// Creates a repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AgentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AgentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AgentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AgentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn create(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let agent_id = agent.id();
        let agent_name = agent.name().clone();
        let new_row = to_new_row(agent);

        self.run_blocking(move |connection| {
            diesel::insert_into(agents::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_write_error(err, agent_id, agent_name))?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        id: AgentId,
        update: &AgentUpdate,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Agent> {
        let changeset = to_changeset(update, at);
        let new_name = update.name.clone();

        self.run_blocking(move |connection| {
            let row = diesel::update(agents::table.filter(agents::id.eq(id.into_inner())))
                .set(&changeset)
                .returning(AgentRow::as_returning())
                .get_result::<AgentRow>(connection)
                .optional()
                .map_err(|err| match new_name {
                    Some(name) => map_write_error(err, id, name),
                    None => AgentRepositoryError::persistence(err),
                })?;
            row.map(row_to_agent)
                .transpose()?
                .ok_or(AgentRepositoryError::NotFound(id))
        })
        .await
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>> {
        self.run_blocking(move |connection| {
            let row = agents::table
                .filter(agents::id.eq(id.into_inner()))
                .select(AgentRow::as_select())
                .first::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_agent).transpose()
        })
        .await
    }

    async fn list(&self, query: &AgentQuery) -> AgentRepositoryResult<Vec<Agent>> {
        let status = query.status;
        let capability = query.capability.as_ref().map(|name| name.as_str().to_owned());
        let offset = i64::try_from(query.page.offset()).map_err(AgentRepositoryError::persistence)?;
        let limit = i64::try_from(query.page.limit()).map_err(AgentRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let mut statement = agents::table
                .select(AgentRow::as_select())
                .order(agents::id.asc())
                .into_boxed();
            if let Some(status_value) = status {
                statement = statement.filter(agents::status.eq(status_value.as_str()));
            }
            if let Some(capability_name) = capability {
                statement = statement.filter(agents::capabilities.contains(vec![capability_name]));
            }
            let rows = statement
                .offset(offset)
                .limit(limit)
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_agent).collect()
        })
        .await
    }

    async fn snapshot(&self, scope: SnapshotScope) -> AgentRepositoryResult<Vec<Agent>> {
        self.run_blocking(move |connection| {
            let mut statement = agents::table
                .select(AgentRow::as_select())
                .order(agents::id.asc())
                .into_boxed();
            if scope == SnapshotScope::ActiveOnly {
                statement = statement.filter(agents::status.eq(AgentStatus::Active.as_str()));
            }
            let rows = statement
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_agent).collect()
        })
        .await
    }

    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count = diesel::delete(agents::table.filter(agents::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(AgentRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(AgentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn map_write_error(err: DieselError, id: AgentId, name: AgentName) -> AgentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
            if info.constraint_name() == Some("idx_agents_name") {
                AgentRepositoryError::DuplicateAgentName(name)
            } else {
                AgentRepositoryError::DuplicateAgent(id)
            }
        }
        _ => AgentRepositoryError::persistence(err),
    }
}

fn to_new_row(agent: &Agent) -> NewAgentRow {
    NewAgentRow {
        id: agent.id().into_inner(),
        name: agent.name().as_str().to_owned(),
        description: agent.description().map(str::to_owned),
        version: agent.version().as_str().to_owned(),
        url: agent.url().as_str().to_owned(),
        health_check_url: agent.health_check_url().map(|url| url.as_str().to_owned()),
        status: agent.status().as_str().to_owned(),
        metadata: serde_json::Value::Object(agent.metadata().clone()),
        capabilities: agent
            .capabilities()
            .iter()
            .map(|name| name.as_str().to_owned())
            .collect(),
        created_at: agent.created_at(),
        updated_at: agent.updated_at(),
    }
}

fn to_changeset(update: &AgentUpdate, at: DateTime<Utc>) -> AgentChangeset {
    AgentChangeset {
        name: update.name.as_ref().map(|name| name.as_str().to_owned()),
        description: update.description.clone(),
        version: update
            .version
            .as_ref()
            .map(|version| version.as_str().to_owned()),
        url: update.url.as_ref().map(|url| url.as_str().to_owned()),
        health_check_url: update
            .health_check_url
            .as_ref()
            .map(|url| url.as_ref().map(|value| value.as_str().to_owned())),
        status: update.status.map(|status| status.as_str().to_owned()),
        metadata: update.metadata.clone().map(serde_json::Value::Object),
        capabilities: update.capabilities.as_ref().map(|names| {
            names
                .iter()
                .map(|name| name.as_str().to_owned())
                .collect()
        }),
        updated_at: at,
    }
}

fn row_to_agent(row: AgentRow) -> AgentRepositoryResult<Agent> {
    let AgentRow {
        id,
        name,
        description,
        version,
        url,
        health_check_url,
        status,
        metadata,
        capabilities,
        created_at,
        updated_at,
    } = row;

    let parsed_name = AgentName::new(name).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_version =
        AgentVersion::new(version).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_url = Endpoint::new(url).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_health_url = health_check_url
        .map(Endpoint::new)
        .transpose()
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_status = AgentStatus::try_from(status.as_str())
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_metadata: Metadata =
        serde_json::from_value(metadata).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_capabilities = capabilities
        .into_iter()
        .map(CapabilityName::new)
        .collect::<Result<CapabilitySet, _>>()
        .map_err(AgentRepositoryError::invalid_persisted_data)?;

    Ok(Agent::from_persisted(PersistedAgentData {
        id: AgentId::from_uuid(id),
        name: parsed_name,
        description,
        version: parsed_version,
        url: parsed_url,
        health_check_url: parsed_health_url,
        status: parsed_status,
        metadata: parsed_metadata,
        capabilities: parsed_capabilities,
        created_at,
        updated_at,
    }))
}
