// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use actee_core::{ActorId, Grant, Role, RoleId, ScopeChain, VerbSet};
use sqlx::{FromRow, Sqlite, query, query_as};

use crate::grants::GrantStore;
use crate::sqlite::{SqliteError, SqliteStore, placeholders};

impl GrantStore for SqliteStore {
    async fn insert_grant(&self, grant: &Grant) -> Result<bool, Self::Error> {
        let result = self
            .tx(async |conn| {
                query(
                    "
                    INSERT OR IGNORE
                    INTO
                        grants_v1 (
                            actor_id,
                            role_id,
                            actee_id
                        )
                    VALUES
                        (?, ?, ?)
                    ",
                )
                .bind(grant.actor_id.to_string())
                .bind(grant.role_id.to_string())
                .bind(grant.actee_id.as_str())
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_grant(&self, grant: &Grant) -> Result<bool, Self::Error> {
        let result = self
            .tx(async |conn| {
                query(
                    "
                    DELETE FROM
                        grants_v1
                    WHERE
                        actor_id = ?
                        AND role_id = ?
                        AND actee_id = ?
                    ",
                )
                .bind(grant.actor_id.to_string())
                .bind(grant.role_id.to_string())
                .bind(grant.actee_id.as_str())
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn grants_for_actor(&self, actor_id: &ActorId) -> Result<Vec<Grant>, Self::Error> {
        let rows: Vec<GrantRow> = self
            .read(async |conn| {
                query_as(
                    "
                    SELECT
                        actor_id,
                        role_id,
                        actee_id
                    FROM
                        grants_v1
                    WHERE
                        actor_id = ?
                    ORDER BY
                        role_id, actee_id
                    ",
                )
                .bind(actor_id.to_string())
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        rows.into_iter().map(Grant::try_from).collect()
    }

    async fn roles_in_scope(
        &self,
        actors: &[ActorId],
        scope: &ScopeChain,
    ) -> Result<Vec<Role>, Self::Error> {
        if actors.is_empty() || scope.is_empty() {
            return Ok(Vec::new());
        }

        // One row per (role, verb) pair, roles without any verbs come with a NULL verb.
        let sql = format!(
            "
            SELECT DISTINCT
                roles_v1.id AS id,
                roles_v1.name AS name,
                roles_v1.system_name AS system_name,
                role_verbs_v1.verb AS verb
            FROM
                grants_v1
                INNER JOIN roles_v1 ON roles_v1.id = grants_v1.role_id
                LEFT JOIN role_verbs_v1 ON role_verbs_v1.role_id = roles_v1.id
            WHERE
                grants_v1.actor_id IN ({})
                AND grants_v1.actee_id IN ({})
            ",
            placeholders(actors.len()),
            placeholders(scope.len()),
        );

        let rows: Vec<RoleVerbRow> = self
            .read(async |conn| {
                let mut statement = query_as::<Sqlite, RoleVerbRow>(&sql);
                for actor_id in actors {
                    statement = statement.bind(actor_id.to_string());
                }
                for actee_id in scope {
                    statement = statement.bind(actee_id.as_str());
                }
                statement
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(SqliteError::Sqlite)
            })
            .await?;

        let mut roles: BTreeMap<RoleId, Role> = BTreeMap::new();
        for row in rows {
            let id = row
                .id
                .parse::<RoleId>()
                .map_err(|err| SqliteError::Decode("role id".into(), err.into()))?;
            let role = roles.entry(id).or_insert_with(|| Role {
                id,
                name: row.name,
                system_name: row.system_name,
                verbs: VerbSet::new(),
            });
            if let Some(verb) = row.verb {
                role.verbs.insert(verb);
            }
        }

        Ok(roles.into_values().collect())
    }
}

/// Single grant row as it is inserted in the SQLite database.
#[derive(Debug, FromRow)]
struct GrantRow {
    actor_id: String,
    role_id: String,
    actee_id: String,
}

impl TryFrom<GrantRow> for Grant {
    type Error = SqliteError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        Ok(Grant {
            actor_id: row
                .actor_id
                .parse::<ActorId>()
                .map_err(|err| SqliteError::Decode("actor id".into(), err.into()))?,
            role_id: row
                .role_id
                .parse::<RoleId>()
                .map_err(|err| SqliteError::Decode("role id".into(), err.into()))?,
            actee_id: row.actee_id.into(),
        })
    }
}

/// Role joined with one of its verbs.
#[derive(Debug, FromRow)]
struct RoleVerbRow {
    id: String,
    name: String,
    system_name: Option<String>,
    verb: Option<String>,
}
