pub mod follows;
pub mod notifications;
pub mod users;

pub use follows::{EnterpriseFollow, FollowFlag, FollowRepository, FollowRelationship};
pub use notifications::{NewNotification, NotificationAudience, NotificationRepository};
pub use users::{UserProfile, UserRepository};
