//! Template selection and delivery for email events.

use chrono::{Datelike, Utc};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::events::{EmailEvent, TemplateKind};
use crate::repository::UserRepository;

use super::email::EmailService;
use super::templates;

/// Picks the rendering and delivery path for an email event.
///
/// Every path except goodbye fetches the recipient's profile by email to
/// personalize the greeting; goodbye addresses a profile that may already
/// be gone and greets from the address local part instead.
#[derive(Clone)]
pub struct EmailDispatcher {
    users: UserRepository,
    mailer: EmailService,
    site_url: String,
    brand_name: String,
}

impl EmailDispatcher {
    pub fn new(
        users: UserRepository,
        mailer: EmailService,
        site_url: String,
        brand_name: String,
    ) -> Self {
        Self {
            users,
            mailer,
            site_url,
            brand_name,
        }
    }

    /// Render and deliver one email. Returns whether a delivery path was
    /// selected, for metric labeling.
    pub async fn dispatch(&self, event: &EmailEvent) -> Result<bool> {
        let year = Utc::now().year();

        let html = match &event.template_name {
            TemplateKind::Welcome => {
                let user = self.users.get_by_email(&event.email).await?;
                templates::welcome(
                    templates::first_name(&user.name),
                    &user.email,
                    &self.site_url,
                    &self.brand_name,
                    year,
                )
            }
            TemplateKind::Goodbye => {
                let local_part = event.email.split('@').next().unwrap_or(&event.email);
                templates::goodbye(templates::first_name(local_part), &self.brand_name, year)
            }
            TemplateKind::ApplicationReceived => {
                let user = self.users.get_by_email(&event.email).await?;
                templates::application_received(
                    templates::first_name(&user.name),
                    required_field(event, &["vacancy", "title"])?,
                    &self.brand_name,
                    year,
                )
            }
            TemplateKind::InterviewScheduled => {
                let user = self.users.get_by_email(&event.email).await?;
                templates::interview_scheduled(
                    templates::first_name(&user.name),
                    required_field(event, &["vacancy", "title"])?,
                    required_field(event, &["interview_details", "link"])?,
                    &self.brand_name,
                    year,
                )
            }
            TemplateKind::OfferExtended => {
                let user = self.users.get_by_email(&event.email).await?;
                templates::offer_extended(
                    templates::first_name(&user.name),
                    required_field(event, &["vacancy", "title"])?,
                    required_field(event, &["offer_details", "document_link"])?,
                    &self.brand_name,
                    year,
                )
            }
            TemplateKind::Hired => {
                let user = self.users.get_by_email(&event.email).await?;
                templates::hired(
                    templates::first_name(&user.name),
                    required_field(event, &["vacancy", "title"])?,
                    &self.brand_name,
                    year,
                )
            }
            TemplateKind::Rejected => {
                let user = self.users.get_by_email(&event.email).await?;
                templates::rejected(
                    templates::first_name(&user.name),
                    required_field(event, &["vacancy", "title"])?,
                    &self.brand_name,
                    year,
                )
            }
            TemplateKind::Unknown(raw) => {
                warn!(
                    event_id = %event.event_id,
                    template = raw.as_str(),
                    "No delivery path for template; dropping event"
                );
                return Ok(false);
            }
        };

        let cc = event.cc.as_deref().unwrap_or(&[]);
        let bcc = event.bcc.as_deref().unwrap_or(&[]);
        self.mailer
            .send(&event.email, &event.subject, html, cc, bcc)
            .await?;

        Ok(true)
    }
}

fn required_field<'e>(event: &'e EmailEvent, path: &[&str]) -> Result<&'e str> {
    event.data_path(path).ok_or_else(|| {
        AppError::MalformedEvent(format!(
            "email event {} is missing data.{}",
            event.event_id,
            path.join(".")
        ))
    })
}
