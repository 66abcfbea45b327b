//! Read-only access to follow edges, consulted by notification fanout.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;

/// Subscription flag carried by a follow edge. Each notification kind
/// expands the audience through exactly one flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowFlag {
    ReceivePost,
    ReceiveComment,
    ReceiveVacancy,
}

impl FollowFlag {
    pub fn column(&self) -> &'static str {
        match self {
            FollowFlag::ReceivePost => "receive_post",
            FollowFlag::ReceiveComment => "receive_comment",
            FollowFlag::ReceiveVacancy => "receive_vacancy",
        }
    }
}

/// Directed user→user follow edge. At most one per (follower, followed).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FollowRelationship {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
    pub receive_post: bool,
    pub receive_comment: bool,
    pub created_at: DateTime<Utc>,
}

/// Directed user→enterprise follow edge.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EnterpriseFollow {
    pub id: i64,
    pub user_id: i64,
    pub enterprise_id: i64,
    pub receive_post: bool,
    pub receive_comment: bool,
    pub receive_vacancy: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All user→user edges pointing at `followed_id` whose flag is set.
    /// Empty result is not an error.
    pub async fn followers_of_user(
        &self,
        followed_id: i64,
        flag: FollowFlag,
    ) -> Result<Vec<FollowRelationship>> {
        let follows = sqlx::query_as::<_, FollowRelationship>(&user_followers_sql(flag))
            .bind(followed_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(follows)
    }

    /// All user→enterprise edges pointing at `enterprise_id` whose flag is
    /// set.
    pub async fn followers_of_enterprise(
        &self,
        enterprise_id: i64,
        flag: FollowFlag,
    ) -> Result<Vec<EnterpriseFollow>> {
        let follows = sqlx::query_as::<_, EnterpriseFollow>(&enterprise_followers_sql(flag))
            .bind(enterprise_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(follows)
    }
}

// Flag columns come from FollowFlag, never from the wire.
fn user_followers_sql(flag: FollowFlag) -> String {
    format!(
        "SELECT id, follower_id, followed_id, receive_post, receive_comment, created_at \
         FROM follower_relationships \
         WHERE followed_id = $1 AND {} = TRUE \
         ORDER BY created_at DESC",
        flag.column()
    )
}

fn enterprise_followers_sql(flag: FollowFlag) -> String {
    format!(
        "SELECT id, user_id, enterprise_id, receive_post, receive_comment, receive_vacancy, created_at \
         FROM enterprise_follows_user \
         WHERE enterprise_id = $1 AND {} = TRUE \
         ORDER BY created_at DESC",
        flag.column()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_columns_match_schema() {
        assert_eq!(FollowFlag::ReceivePost.column(), "receive_post");
        assert_eq!(FollowFlag::ReceiveComment.column(), "receive_comment");
        assert_eq!(FollowFlag::ReceiveVacancy.column(), "receive_vacancy");
    }

    #[test]
    fn expansion_filters_on_the_event_flag() {
        let sql = user_followers_sql(FollowFlag::ReceivePost);
        assert!(sql.contains("WHERE followed_id = $1 AND receive_post = TRUE"));

        let sql = enterprise_followers_sql(FollowFlag::ReceiveVacancy);
        assert!(sql.contains("WHERE enterprise_id = $1 AND receive_vacancy = TRUE"));
    }
}
