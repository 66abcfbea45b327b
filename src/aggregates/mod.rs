//! Metric aggregate descriptors and in-memory counter mutation.
//!
//! The original per-kind service/repository stacks collapse into one
//! generic operation over a static descriptor: table identity plus the
//! registry of counter columns the aggregate carries. Column names arrive
//! as free-form strings on the wire and are resolved against the registry,
//! so an unknown column is a typed error instead of a silent miss.

pub mod store;

pub use store::CounterStore;

use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::events::{CounterAction, EntityKind};

/// Static description of one aggregate kind: where it lives and which
/// counters it carries.
#[derive(Debug, PartialEq, Eq)]
pub struct AggregateDescriptor {
    /// Wire discriminant, e.g. "USER_METRIC"
    pub entity: &'static str,
    /// Table holding one row per owning entity
    pub table: &'static str,
    /// Primary-key column naming the owning entity
    pub id_column: &'static str,
    /// Counter columns, all BIGINT, all non-negative
    pub columns: &'static [&'static str],
}

pub static REGISTRY: &[AggregateDescriptor] = &[
    AggregateDescriptor {
        entity: "USER_METRIC",
        table: "metric_users",
        id_column: "user_id",
        columns: &[
            "post_count",
            "favorite_post_count",
            "comment_count",
            "favorite_comment_count",
            "follower_count",
            "followed_count",
            "share_count",
            "connection_count",
            "blocked_count",
            "reaction_comment_given_count",
            "reaction_comment_received_count",
            "enterprise_follow_count",
            "enterprise_follower_count",
            "profile_view_count",
            "vacancy_application_count",
        ],
    },
    AggregateDescriptor {
        entity: "VACANCY_METRIC",
        table: "metric_vacancies",
        id_column: "vacancy_id",
        columns: &[
            "shortlists_count",
            "shares_count",
            "views_count",
            "applications_count",
            "interview_count",
        ],
    },
    AggregateDescriptor {
        entity: "ENTERPRISE_METRIC",
        table: "metric_enterprises",
        id_column: "enterprise_id",
        columns: &[
            "followed_count",
            "follower_count",
            "vacancies_count",
            "post_count",
            "comment_post",
            "view_count",
            "review_count",
            "employments_count",
        ],
    },
    AggregateDescriptor {
        entity: "POST_ENTERPRISE_METRIC",
        table: "metric_posts_enterprise",
        id_column: "post_id",
        columns: &[
            "views_count",
            "shares_count",
            "reactions_like_count",
            "reactions_dislike_count",
            "favorites_count",
            "comments_count",
        ],
    },
    AggregateDescriptor {
        entity: "POST_USER_METRIC",
        table: "metric_posts_user",
        id_column: "post_id",
        columns: &[
            "views_count",
            "shares_count",
            "reactions_like_count",
            "reactions_dislike_count",
            "favorites_count",
            "comments_count",
        ],
    },
    AggregateDescriptor {
        entity: "COMMENT_POST_ENTERPRISE_METRIC",
        table: "metric_comments_enterprise",
        id_column: "comment_id",
        columns: &[
            "replies_count",
            "edited_count",
            "views_count",
            "shares_count",
            "reactions_like_count",
            "reactions_dislike_count",
            "favorites_count",
        ],
    },
    AggregateDescriptor {
        entity: "COMMENT_POST_USER_METRIC",
        table: "metric_comments_user",
        id_column: "comment_id",
        columns: &[
            "replies_count",
            "edited_count",
            "views_count",
            "shares_count",
            "reactions_like_count",
            "reactions_dislike_count",
            "favorites_count",
        ],
    },
];

/// Resolve the descriptor for an event's entity discriminant.
pub fn descriptor_for(kind: &EntityKind) -> Option<&'static AggregateDescriptor> {
    REGISTRY.iter().find(|d| d.entity == kind.as_str())
}

/// Validate the static registry at startup: unique entities and tables,
/// non-empty column sets without duplicates or id-column collisions.
pub fn validate_registry() -> Result<()> {
    for (i, descriptor) in REGISTRY.iter().enumerate() {
        if descriptor.columns.is_empty() {
            return Err(AppError::Config(format!(
                "aggregate {} has no counter columns",
                descriptor.entity
            )));
        }
        for column in descriptor.columns {
            if *column == descriptor.id_column {
                return Err(AppError::Config(format!(
                    "aggregate {} lists its id column {} as a counter",
                    descriptor.entity, column
                )));
            }
            let occurrences = descriptor.columns.iter().filter(|c| *c == column).count();
            if occurrences > 1 {
                return Err(AppError::Config(format!(
                    "aggregate {} lists column {} more than once",
                    descriptor.entity, column
                )));
            }
        }
        for other in &REGISTRY[i + 1..] {
            if other.entity == descriptor.entity || other.table == descriptor.table {
                return Err(AppError::Config(format!(
                    "aggregates {} and {} collide",
                    descriptor.entity, other.entity
                )));
            }
        }
    }
    Ok(())
}

/// Result of one applied counter mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterChange {
    /// Canonical column name from the registry
    pub column: &'static str,
    pub previous: i64,
    pub current: i64,
}

/// One aggregate row, loaded into memory for mutation.
#[derive(Debug, Clone)]
pub struct MetricAggregate {
    pub descriptor: &'static AggregateDescriptor,
    pub owner_id: i64,
    counters: BTreeMap<&'static str, i64>,
}

impl MetricAggregate {
    /// An aggregate with every counter at zero.
    pub fn new(descriptor: &'static AggregateDescriptor, owner_id: i64) -> Self {
        let counters = descriptor.columns.iter().map(|c| (*c, 0i64)).collect();
        Self {
            descriptor,
            owner_id,
            counters,
        }
    }

    /// Set one counter, resolving the column against the registry.
    pub fn with_counter(mut self, column: &str, value: i64) -> Result<Self> {
        let canonical = self.resolve_column(column)?;
        self.counters.insert(canonical, value);
        Ok(self)
    }

    /// Current value of a counter, if the aggregate carries it.
    pub fn counter(&self, column: &str) -> Option<i64> {
        self.counters.get(column).copied()
    }

    /// Apply one SUM/RED mutation in memory.
    ///
    /// SUM increments by one. RED decrements by one, saturating at zero;
    /// counters never go negative. Unknown columns leave the aggregate
    /// numerically unchanged and return a typed error.
    pub fn apply_action(&mut self, column: &str, action: CounterAction) -> Result<CounterChange> {
        let canonical = self.resolve_column(column)?;
        let previous = self.counters[canonical];
        let current = match action {
            CounterAction::Sum => previous + 1,
            CounterAction::Red => (previous - 1).max(0),
        };
        self.counters.insert(canonical, current);
        Ok(CounterChange {
            column: canonical,
            previous,
            current,
        })
    }

    fn resolve_column(&self, column: &str) -> Result<&'static str> {
        self.descriptor
            .columns
            .iter()
            .find(|c| **c == column)
            .copied()
            .ok_or_else(|| AppError::UnknownColumn {
                entity: self.descriptor.entity,
                column: column.to_string(),
            })
    }

    pub(crate) fn insert_raw(&mut self, column: &'static str, value: i64) {
        self.counters.insert(column, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_descriptor() -> &'static AggregateDescriptor {
        descriptor_for(&EntityKind::UserMetric).unwrap()
    }

    #[test]
    fn registry_is_valid() {
        validate_registry().unwrap();
    }

    #[test]
    fn every_routable_entity_has_a_descriptor() {
        for kind in [
            EntityKind::UserMetric,
            EntityKind::VacancyMetric,
            EntityKind::EnterpriseMetric,
            EntityKind::PostEnterpriseMetric,
            EntityKind::PostUserMetric,
            EntityKind::CommentPostEnterpriseMetric,
            EntityKind::CommentPostUserMetric,
        ] {
            assert!(descriptor_for(&kind).is_some(), "{:?}", kind);
        }
        assert!(descriptor_for(&EntityKind::Unknown("BADGE_METRIC".into())).is_none());
    }

    #[test]
    fn sum_increments_by_exactly_one() {
        let mut aggregate = MetricAggregate::new(user_descriptor(), 42)
            .with_counter("post_count", 5)
            .unwrap();
        let change = aggregate.apply_action("post_count", CounterAction::Sum).unwrap();
        assert_eq!(change.previous, 5);
        assert_eq!(change.current, 6);
        assert_eq!(aggregate.counter("post_count"), Some(6));
    }

    #[test]
    fn red_saturates_at_zero() {
        let mut aggregate = MetricAggregate::new(user_descriptor(), 42);
        let change = aggregate.apply_action("post_count", CounterAction::Red).unwrap();
        assert_eq!(change.current, 0);
        assert_eq!(aggregate.counter("post_count"), Some(0));
    }

    #[test]
    fn counters_never_go_negative_over_any_sequence() {
        let mut aggregate = MetricAggregate::new(user_descriptor(), 1);
        let ops = [
            CounterAction::Red,
            CounterAction::Red,
            CounterAction::Sum,
            CounterAction::Red,
            CounterAction::Red,
            CounterAction::Red,
            CounterAction::Sum,
            CounterAction::Sum,
        ];
        for action in ops {
            aggregate.apply_action("follower_count", action).unwrap();
            assert!(aggregate.counter("follower_count").unwrap() >= 0);
        }
        assert_eq!(aggregate.counter("follower_count"), Some(2));
    }

    #[test]
    fn duplicate_delivery_double_counts() {
        // At-least-once with no dedup: the same event applied twice moves
        // the counter twice.
        let mut aggregate = MetricAggregate::new(user_descriptor(), 42);
        aggregate.apply_action("share_count", CounterAction::Sum).unwrap();
        aggregate.apply_action("share_count", CounterAction::Sum).unwrap();
        assert_eq!(aggregate.counter("share_count"), Some(2));
    }

    #[test]
    fn unknown_column_is_typed_and_leaves_aggregate_unchanged() {
        let mut aggregate = MetricAggregate::new(user_descriptor(), 42)
            .with_counter("post_count", 3)
            .unwrap();
        let err = aggregate
            .apply_action("view_count", CounterAction::Sum)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::UnknownColumn { entity: "USER_METRIC", .. }
        ));
        for column in user_descriptor().columns {
            let expected = if *column == "post_count" { 3 } else { 0 };
            assert_eq!(aggregate.counter(column), Some(expected));
        }
    }
}
