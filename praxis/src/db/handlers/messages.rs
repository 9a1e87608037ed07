//! Repositories for message threads and their messages.
//!
//! Messages inherit the thread's organization; every message operation
//! first proves the thread belongs to the caller's tenant.

use crate::db::errors::{DbError, Result};
use crate::db::models::messages::{MessageDBResponse, ThreadCreateDBRequest, ThreadDBResponse};
use crate::types::{OrganizationId, ThreadId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

const THREAD_COLUMNS: &str =
    "id, organization_id, client_id, subject, created_by, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, organization_id, thread_id, sender_id, body, created_at";

#[derive(Debug, Clone)]
pub struct ThreadFilter {
    pub skip: i64,
    pub limit: i64,
}

pub struct Threads<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Threads<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    pub async fn create(
        &mut self,
        org: OrganizationId,
        created_by: UserId,
        request: &ThreadCreateDBRequest,
    ) -> Result<ThreadDBResponse> {
        if let Some(client_id) = request.client_id {
            super::ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let thread = sqlx::query_as::<_, ThreadDBResponse>(&format!(
            "INSERT INTO message_threads (organization_id, client_id, subject, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING {THREAD_COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(&request.subject)
        .bind(created_by)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(thread)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), thread_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: ThreadId,
    ) -> Result<Option<ThreadDBResponse>> {
        let thread = sqlx::query_as::<_, ThreadDBResponse>(&format!(
            "SELECT {THREAD_COLUMNS} FROM message_threads WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(thread)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    pub async fn list(
        &mut self,
        org: OrganizationId,
        filter: &ThreadFilter,
    ) -> Result<Vec<ThreadDBResponse>> {
        let threads = sqlx::query_as::<_, ThreadDBResponse>(&format!(
            "SELECT {THREAD_COLUMNS} FROM message_threads WHERE organization_id = $1 \
             ORDER BY updated_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(org)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(threads)
    }
}

pub struct Messages<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Messages<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Append a message, proving thread ownership first. Also bumps the
    /// thread's `updated_at` so listings sort by recent activity.
    #[instrument(
        skip(self, body),
        fields(org_id = %abbrev_uuid(&org), thread_id = %abbrev_uuid(&thread)),
        err
    )]
    pub async fn create(
        &mut self,
        org: OrganizationId,
        thread: ThreadId,
        sender: UserId,
        body: &str,
    ) -> Result<MessageDBResponse> {
        super::ensure_owned(self.db, "message_threads", thread, org).await?;

        let message = sqlx::query_as::<_, MessageDBResponse>(&format!(
            "INSERT INTO messages (organization_id, thread_id, sender_id, body) \
             VALUES ($1, $2, $3, $4) RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(org)
        .bind(thread)
        .bind(sender)
        .bind(body)
        .fetch_one(&mut *self.db)
        .await?;

        sqlx::query("UPDATE message_threads SET updated_at = now() WHERE id = $1")
            .bind(thread)
            .execute(&mut *self.db)
            .await?;

        Ok(message)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), thread_id = %abbrev_uuid(&thread)),
        err
    )]
    pub async fn list_for_thread(
        &mut self,
        org: OrganizationId,
        thread: ThreadId,
    ) -> Result<Vec<MessageDBResponse>> {
        super::ensure_owned(self.db, "message_threads", thread, org).await?;

        let messages = sqlx::query_as::<_, MessageDBResponse>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE thread_id = $1 ORDER BY created_at ASC"
        ))
        .bind(thread)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Organizations, Users};
    use crate::db::models::users::UserCreateDBRequest;
    use sqlx::PgPool;

    async fn setup(conn: &mut PgConnection) -> (OrganizationId, UserId) {
        let org = Organizations::new(&mut *conn).create("A").await.unwrap().id;
        let user = Users::new(&mut *conn)
            .create(&UserCreateDBRequest {
                email: "sender@example.com".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                display_name: "Sender".to_string(),
            })
            .await
            .unwrap()
            .id;
        (org, user)
    }

    #[test_log::test(sqlx::test)]
    async fn test_thread_and_messages(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let (org, user) = setup(&mut conn).await;

        let thread = Threads::new(&mut conn)
            .create(
                org,
                user,
                &ThreadCreateDBRequest {
                    client_id: None,
                    subject: "Kickoff".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(thread.created_by, Some(user));

        let mut messages = Messages::new(&mut conn);
        messages.create(org, thread.id, user, "Hello").await.unwrap();
        messages.create(org, thread.id, user, "Agenda attached").await.unwrap();

        let listed = messages.list_for_thread(org, thread.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].body, "Hello");
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_thread_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let (org_a, user) = setup(&mut conn).await;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let thread = Threads::new(&mut conn)
            .create(
                org_a,
                user,
                &ThreadCreateDBRequest {
                    client_id: None,
                    subject: "Private".to_string(),
                },
            )
            .await
            .unwrap();

        let err = Messages::new(&mut conn)
            .create(org_b, thread.id, user, "intrusion")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));

        let err = Messages::new(&mut conn)
            .list_for_thread(org_b, thread.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
