pub mod email;
pub mod email_dispatch;
pub mod fanout;
pub mod templates;

pub use email::EmailService;
pub use email_dispatch::EmailDispatcher;
pub use fanout::NotificationFanout;
