// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Role, RoleId, VerbSet};
use sqlx::{FromRow, SqliteConnection, query, query_as};

use crate::roles::RoleStore;
use crate::sqlite::{SqliteError, SqliteStore};

impl RoleStore for SqliteStore {
    async fn insert_role(&self, role: &Role) -> Result<bool, Self::Error> {
        self.tx(async |conn| {
            let result = query(
                "
                INSERT OR IGNORE
                INTO
                    roles_v1 (
                        id,
                        name,
                        system_name
                    )
                VALUES
                    (?, ?, ?)
                ",
            )
            .bind(role.id.to_string())
            .bind(&role.name)
            .bind(role.system_name.as_deref())
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(false);
            }

            for verb in &role.verbs {
                query(
                    "
                    INSERT INTO
                        role_verbs_v1 (
                            role_id,
                            verb
                        )
                    VALUES
                        (?, ?)
                    ",
                )
                .bind(role.id.to_string())
                .bind(verb.as_str())
                .execute(&mut *conn)
                .await?;
            }

            Ok(true)
        })
        .await
    }

    async fn role(&self, id: &RoleId) -> Result<Option<Role>, Self::Error> {
        self.read(async |conn| {
            let row: Option<RoleRow> = query_as(
                "
                SELECT
                    id,
                    name,
                    system_name
                FROM
                    roles_v1
                WHERE
                    id = ?
                ",
            )
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;

            match row {
                Some(row) => Ok(Some(row.into_role(conn).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn role_by_system_name(&self, system_name: &str) -> Result<Option<Role>, Self::Error> {
        self.read(async |conn| {
            let row: Option<RoleRow> = query_as(
                "
                SELECT
                    id,
                    name,
                    system_name
                FROM
                    roles_v1
                WHERE
                    system_name = ?
                ",
            )
            .bind(system_name)
            .fetch_optional(&mut *conn)
            .await?;

            match row {
                Some(row) => Ok(Some(row.into_role(conn).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn delete_role(&self, id: &RoleId) -> Result<bool, Self::Error> {
        self.tx(async |conn| {
            let id = id.to_string();

            let result = query("DELETE FROM roles_v1 WHERE id = ?")
                .bind(&id)
                .execute(&mut *conn)
                .await?;
            if result.rows_affected() == 0 {
                return Ok(false);
            }

            query("DELETE FROM role_verbs_v1 WHERE role_id = ?")
                .bind(&id)
                .execute(&mut *conn)
                .await?;
            query("DELETE FROM grants_v1 WHERE role_id = ?")
                .bind(&id)
                .execute(&mut *conn)
                .await?;

            Ok(true)
        })
        .await
    }
}

/// Single role row as it is inserted in the SQLite database, verbs live in their own table.
#[derive(Debug, FromRow)]
struct RoleRow {
    id: String,
    name: String,
    system_name: Option<String>,
}

impl RoleRow {
    async fn into_role(self, conn: &mut SqliteConnection) -> Result<Role, SqliteError> {
        let verbs: Vec<(String,)> = query_as(
            "
            SELECT
                verb
            FROM
                role_verbs_v1
            WHERE
                role_id = ?
            ",
        )
        .bind(&self.id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Role {
            id: self
                .id
                .parse::<RoleId>()
                .map_err(|err| SqliteError::Decode("role id".into(), err.into()))?,
            name: self.name,
            system_name: self.system_name,
            verbs: verbs.into_iter().map(|(verb,)| verb).collect::<VerbSet>(),
        })
    }
}
