//! Transactional persistence for metric aggregates.

use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::events::CounterAction;

use super::{AggregateDescriptor, MetricAggregate, REGISTRY};

/// Applies bounded counter mutations to aggregate rows.
///
/// One unit of work per call: the row is locked, mutated and committed in a
/// single transaction, then reloaded so the caller sees durable state.
/// Concurrent mutations of the same aggregate are serialized by the row
/// lock, not by application-level locking.
#[derive(Clone)]
pub struct CounterStore {
    pool: PgPool,
}

impl CounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch exactly one aggregate row by owner id.
    pub async fn get_aggregate(
        &self,
        descriptor: &'static AggregateDescriptor,
        owner_id: i64,
    ) -> Result<MetricAggregate> {
        let row = sqlx::query(&select_sql(descriptor, false))
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        let row = row.ok_or(AppError::AggregateNotFound {
            entity: descriptor.entity,
            id: owner_id,
        })?;

        from_row(descriptor, owner_id, &row)
    }

    /// Apply one SUM/RED mutation and return the reloaded durable state.
    pub async fn apply(
        &self,
        descriptor: &'static AggregateDescriptor,
        owner_id: i64,
        column: &str,
        action: CounterAction,
    ) -> Result<MetricAggregate> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&select_sql(descriptor, true))
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?;

        let row = row.ok_or(AppError::AggregateNotFound {
            entity: descriptor.entity,
            id: owner_id,
        })?;
        let mut aggregate = from_row(descriptor, owner_id, &row)?;

        // UnknownColumn propagates here; the open transaction rolls back
        // on drop, leaving the row untouched.
        let change = aggregate.apply_action(column, action)?;

        sqlx::query(&update_sql(descriptor, change.column))
            .bind(change.current)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            entity = descriptor.entity,
            owner_id,
            column = change.column,
            action = action.as_str(),
            previous = change.previous,
            current = change.current,
            "Counter updated"
        );

        self.get_aggregate(descriptor, owner_id).await
    }

    /// Compare the registry against information_schema and warn about
    /// drift. Runs once on boot; mismatches degrade to per-message errors
    /// later, so this only reports.
    pub async fn verify_schema(&self) -> Result<()> {
        for descriptor in REGISTRY {
            let known: Vec<String> = sqlx::query_scalar(
                r#"
                SELECT column_name FROM information_schema.columns
                WHERE table_name = $1
                "#,
            )
            .bind(descriptor.table)
            .fetch_all(&self.pool)
            .await?;

            if known.is_empty() {
                warn!(table = descriptor.table, "Aggregate table missing from schema");
                continue;
            }

            for column in descriptor.columns {
                if !known.iter().any(|c| c == column) {
                    warn!(
                        table = descriptor.table,
                        column, "Registry column missing from schema"
                    );
                }
            }
        }
        Ok(())
    }
}

// Column identifiers come from the static registry, never from the wire.
fn select_sql(descriptor: &AggregateDescriptor, for_update: bool) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1{}",
        descriptor.columns.join(", "),
        descriptor.table,
        descriptor.id_column,
        if for_update { " FOR UPDATE" } else { "" }
    )
}

fn update_sql(descriptor: &AggregateDescriptor, column: &str) -> String {
    format!(
        "UPDATE {} SET {} = $1, updated_at = NOW() WHERE {} = $2",
        descriptor.table, column, descriptor.id_column
    )
}

fn from_row(
    descriptor: &'static AggregateDescriptor,
    owner_id: i64,
    row: &sqlx::postgres::PgRow,
) -> Result<MetricAggregate> {
    let mut aggregate = MetricAggregate::new(descriptor, owner_id);
    for &column in descriptor.columns {
        let value: i64 = row.try_get(column)?;
        aggregate.insert_raw(column, value);
    }
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::descriptor_for;
    use crate::events::EntityKind;

    #[test]
    fn select_sql_names_only_registry_columns() {
        let descriptor = descriptor_for(&EntityKind::VacancyMetric).unwrap();
        let sql = select_sql(descriptor, true);
        assert!(sql.starts_with("SELECT shortlists_count, shares_count"));
        assert!(sql.ends_with("FROM metric_vacancies WHERE vacancy_id = $1 FOR UPDATE"));
    }

    #[test]
    fn update_sql_touches_updated_at() {
        let descriptor = descriptor_for(&EntityKind::UserMetric).unwrap();
        let sql = update_sql(descriptor, "post_count");
        assert_eq!(
            sql,
            "UPDATE metric_users SET post_count = $1, updated_at = NOW() WHERE user_id = $2"
        );
    }
}
