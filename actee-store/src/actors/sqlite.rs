// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use actee_core::{Actee, ActeeId, Actor, ActorId, ActorKind, Timestamp};
use sqlx::{FromRow, SqliteConnection, query, query_as};
use tracing::trace;

use crate::actors::{ActeeStore, ActorStore};
use crate::sqlite::{SqliteError, SqliteStore, decode_timestamp};

impl ActorStore for SqliteStore {
    async fn insert_actor(&self, actor: &Actor) -> Result<bool, Self::Error> {
        self.tx(async |conn| {
            let result = query(
                "
                INSERT OR IGNORE
                INTO
                    actors_v1 (
                        id,
                        kind,
                        actee_id,
                        display_name,
                        created_at,
                        updated_at,
                        deleted_at
                    )
                VALUES
                    (?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(actor.id.to_string())
            .bind(actor.kind.as_str())
            .bind(actor.actee_id.as_str())
            .bind(&actor.display_name)
            .bind(actor.created_at as i64)
            .bind(actor.updated_at.map(|ts| ts as i64))
            .bind(actor.deleted_at.map(|ts| ts as i64))
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(false);
            }

            insert_meta(conn, actor).await?;
            Ok(true)
        })
        .await
    }

    async fn actor(&self, id: &ActorId) -> Result<Option<Actor>, Self::Error> {
        self.read(async |conn| {
            let row: Option<ActorRow> = query_as(
                "
                SELECT
                    id,
                    kind,
                    actee_id,
                    display_name,
                    created_at,
                    updated_at,
                    deleted_at
                FROM
                    actors_v1
                WHERE
                    id = ?
                ",
            )
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;

            match row {
                Some(row) => Ok(Some(row.into_actor(conn).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn actor_by_actee(&self, actee_id: &ActeeId) -> Result<Option<Actor>, Self::Error> {
        self.read(async |conn| {
            let row: Option<ActorRow> = query_as(
                "
                SELECT
                    id,
                    kind,
                    actee_id,
                    display_name,
                    created_at,
                    updated_at,
                    deleted_at
                FROM
                    actors_v1
                WHERE
                    actee_id = ?
                ",
            )
            .bind(actee_id.as_str())
            .fetch_optional(&mut *conn)
            .await?;

            match row {
                Some(row) => Ok(Some(row.into_actor(conn).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn update_actor(&self, actor: &Actor) -> Result<bool, Self::Error> {
        self.tx(async |conn| {
            let result = query(
                "
                UPDATE
                    actors_v1
                SET
                    display_name = ?,
                    updated_at = ?,
                    deleted_at = ?
                WHERE
                    id = ?
                ",
            )
            .bind(&actor.display_name)
            .bind(actor.updated_at.map(|ts| ts as i64))
            .bind(actor.deleted_at.map(|ts| ts as i64))
            .bind(actor.id.to_string())
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(false);
            }

            query("DELETE FROM actor_meta_v1 WHERE actor_id = ?")
                .bind(actor.id.to_string())
                .execute(&mut *conn)
                .await?;
            insert_meta(conn, actor).await?;

            Ok(true)
        })
        .await
    }

    async fn delete_actor(&self, id: &ActorId) -> Result<bool, Self::Error> {
        self.tx(async |conn| remove_actor(conn, id).await).await
    }

    async fn actors_of_kind(&self, kind: ActorKind) -> Result<Vec<Actor>, Self::Error> {
        self.read(async |conn| {
            let rows: Vec<ActorRow> = query_as(
                "
                SELECT
                    id,
                    kind,
                    actee_id,
                    display_name,
                    created_at,
                    updated_at,
                    deleted_at
                FROM
                    actors_v1
                WHERE
                    kind = ?
                ORDER BY
                    created_at, id
                ",
            )
            .bind(kind.as_str())
            .fetch_all(&mut *conn)
            .await?;

            let mut actors = Vec::with_capacity(rows.len());
            for row in rows {
                actors.push(row.into_actor(conn).await?);
            }
            Ok(actors)
        })
        .await
    }

    async fn delete_actors_created_before(
        &self,
        kind: ActorKind,
        before: Timestamp,
    ) -> Result<usize, Self::Error> {
        self.tx(async |conn| {
            let expired: Vec<(String,)> = query_as(
                "
                SELECT
                    id
                FROM
                    actors_v1
                WHERE
                    kind = ?
                    AND created_at < ?
                ",
            )
            .bind(kind.as_str())
            .bind(before as i64)
            .fetch_all(&mut *conn)
            .await?;

            let mut removed = 0;
            for (id,) in expired {
                let id = id
                    .parse::<ActorId>()
                    .map_err(|err| SqliteError::Decode("actor id".into(), err.into()))?;
                if remove_actor(conn, &id).await? {
                    removed += 1;
                }
            }
            Ok(removed)
        })
        .await
    }
}

impl ActeeStore for SqliteStore {
    async fn insert_actee(&self, actee: &Actee) -> Result<bool, Self::Error> {
        let result = self
            .tx(async |conn| {
                query(
                    "
                    INSERT OR IGNORE
                    INTO
                        actees_v1 (
                            id,
                            kind
                        )
                    VALUES
                        (?, ?)
                    ",
                )
                .bind(actee.id.as_str())
                .bind(&actee.kind)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn actee(&self, id: &ActeeId) -> Result<Option<Actee>, Self::Error> {
        let row: Option<(String, String)> = self
            .read(async |conn| {
                query_as(
                    "
                    SELECT
                        id,
                        kind
                    FROM
                        actees_v1
                    WHERE
                        id = ?
                    ",
                )
                .bind(id.as_str())
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(row.map(|(id, kind)| Actee::new(id, kind)))
    }
}

async fn insert_meta(conn: &mut SqliteConnection, actor: &Actor) -> Result<(), SqliteError> {
    for (key, value) in &actor.meta {
        query(
            "
            INSERT INTO
                actor_meta_v1 (
                    actor_id,
                    key,
                    value
                )
            VALUES
                (?, ?, ?)
            ",
        )
        .bind(actor.id.to_string())
        .bind(key)
        .bind(value)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Hard-delete an actor row with its meta data, grants and memberships.
async fn remove_actor(conn: &mut SqliteConnection, id: &ActorId) -> Result<bool, SqliteError> {
    let id = id.to_string();

    let actee_id: Option<(String,)> =
        query_as("DELETE FROM actors_v1 WHERE id = ? RETURNING actee_id")
            .bind(&id)
            .fetch_optional(&mut *conn)
            .await?;
    let Some((actee_id,)) = actee_id else {
        return Ok(false);
    };

    query("DELETE FROM actor_meta_v1 WHERE actor_id = ?")
        .bind(&id)
        .execute(&mut *conn)
        .await?;
    query("DELETE FROM grants_v1 WHERE actor_id = ? OR actee_id = ?")
        .bind(&id)
        .bind(&actee_id)
        .execute(&mut *conn)
        .await?;
    query("DELETE FROM actees_v1 WHERE id = ?")
        .bind(&actee_id)
        .execute(&mut *conn)
        .await?;
    query("DELETE FROM memberships_v1 WHERE member_id = ? OR group_id = ?")
        .bind(&id)
        .bind(&id)
        .execute(&mut *conn)
        .await?;

    trace!(actor = %id, "removed actor with its actee, grants and memberships");
    Ok(true)
}

/// Single actor row as it is inserted in the SQLite database, without meta data.
#[derive(Debug, FromRow)]
struct ActorRow {
    id: String,
    kind: String,
    actee_id: String,
    display_name: String,
    created_at: i64,
    updated_at: Option<i64>,
    deleted_at: Option<i64>,
}

impl ActorRow {
    async fn into_actor(self, conn: &mut SqliteConnection) -> Result<Actor, SqliteError> {
        let meta: Vec<(String, String)> = query_as(
            "
            SELECT
                key,
                value
            FROM
                actor_meta_v1
            WHERE
                actor_id = ?
            ",
        )
        .bind(&self.id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Actor {
            id: self
                .id
                .parse::<ActorId>()
                .map_err(|err| SqliteError::Decode("actor id".into(), err.into()))?,
            kind: self
                .kind
                .parse::<ActorKind>()
                .map_err(|err| SqliteError::Decode("actor kind".into(), err.into()))?,
            actee_id: self.actee_id.into(),
            display_name: self.display_name,
            meta: meta.into_iter().collect::<BTreeMap<_, _>>(),
            created_at: decode_timestamp(self.created_at)?,
            updated_at: self.updated_at.map(decode_timestamp).transpose()?,
            deleted_at: self.deleted_at.map(decode_timestamp).transpose()?,
        })
    }
}
