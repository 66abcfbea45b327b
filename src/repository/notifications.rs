//! Notification row persistence for users and enterprises.

use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;

/// Which notification table a record lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAudience {
    User,
    Enterprise,
}

impl NotificationAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationAudience::User => "user",
            NotificationAudience::Enterprise => "enterprise",
        }
    }

    fn table(&self) -> &'static str {
        match self {
            NotificationAudience::User => "notifications",
            NotificationAudience::Enterprise => "notifications_enterprise",
        }
    }

    fn recipient_column(&self) -> &'static str {
        match self {
            NotificationAudience::User => "user_id",
            NotificationAudience::Enterprise => "enterprise_id",
        }
    }
}

/// One notification row to insert. Never merged or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    /// Event-kind discriminant stored alongside the row
    pub kind: String,
    pub entity_id: Option<i64>,
}

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single notification row.
    pub async fn insert(
        &self,
        audience: NotificationAudience,
        record: &NewNotification,
    ) -> Result<()> {
        sqlx::query(&insert_sql(audience))
            .bind(record.recipient_id)
            .bind(&record.title)
            .bind(&record.content)
            .bind(&record.link)
            .bind(&record.kind)
            .bind(record.entity_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a batch in one transaction. Any failure rolls back the whole
    /// batch; there is no partial commit.
    pub async fn insert_batch(
        &self,
        audience: NotificationAudience,
        records: &[NewNotification],
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let sql = insert_sql(audience);

        for record in records {
            sqlx::query(&sql)
                .bind(record.recipient_id)
                .bind(&record.title)
                .bind(&record.content)
                .bind(&record.link)
                .bind(&record.kind)
                .bind(record.entity_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(
            audience = audience.as_str(),
            count = records.len(),
            "Notification batch committed"
        );
        Ok(records.len() as u64)
    }
}

fn insert_sql(audience: NotificationAudience) -> String {
    format!(
        r#"
        INSERT INTO {} ({}, title, content, link, type, entity_id, is_view, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW())
        "#,
        audience.table(),
        audience.recipient_column()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audiences_map_to_distinct_tables() {
        assert_eq!(NotificationAudience::User.table(), "notifications");
        assert_eq!(
            NotificationAudience::Enterprise.table(),
            "notifications_enterprise"
        );
        assert_ne!(
            NotificationAudience::User.recipient_column(),
            NotificationAudience::Enterprise.recipient_column()
        );
    }
}
