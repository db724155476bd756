// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{ActorId, Membership};
use sqlx::{query, query_as};

use crate::memberships::MembershipStore;
use crate::sqlite::{SqliteError, SqliteStore};

impl MembershipStore for SqliteStore {
    async fn insert_membership(&self, membership: &Membership) -> Result<bool, Self::Error> {
        let result = self
            .tx(async |conn| {
                query(
                    "
                    INSERT OR IGNORE
                    INTO
                        memberships_v1 (
                            member_id,
                            group_id
                        )
                    VALUES
                        (?, ?)
                    ",
                )
                .bind(membership.member.to_string())
                .bind(membership.group.to_string())
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_membership(&self, membership: &Membership) -> Result<bool, Self::Error> {
        let result = self
            .tx(async |conn| {
                query(
                    "
                    DELETE FROM
                        memberships_v1
                    WHERE
                        member_id = ?
                        AND group_id = ?
                    ",
                )
                .bind(membership.member.to_string())
                .bind(membership.group.to_string())
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn groups_of(&self, member: &ActorId) -> Result<Vec<ActorId>, Self::Error> {
        let rows: Vec<(String,)> = self
            .read(async |conn| {
                query_as(
                    "
                    SELECT
                        group_id
                    FROM
                        memberships_v1
                    WHERE
                        member_id = ?
                    ORDER BY
                        group_id
                    ",
                )
                .bind(member.to_string())
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        decode_actor_ids(rows)
    }

    async fn members_of(&self, group: &ActorId) -> Result<Vec<ActorId>, Self::Error> {
        let rows: Vec<(String,)> = self
            .read(async |conn| {
                query_as(
                    "
                    SELECT
                        member_id
                    FROM
                        memberships_v1
                    WHERE
                        group_id = ?
                    ORDER BY
                        member_id
                    ",
                )
                .bind(group.to_string())
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        decode_actor_ids(rows)
    }
}

fn decode_actor_ids(rows: Vec<(String,)>) -> Result<Vec<ActorId>, SqliteError> {
    rows.into_iter()
        .map(|(id,)| {
            id.parse::<ActorId>()
                .map_err(|err| SqliteError::Decode("actor id".into(), err.into()))
        })
        .collect()
}
