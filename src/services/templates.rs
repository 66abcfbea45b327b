//! Transactional email bodies.
//!
//! Each template is a fixed HTML document with named substitution fields.
//! Content is intentionally plain; styling matches the other outbound mail
//! of the platform.

/// First-name token of a stored full name: the first non-empty segment
/// when split on whitespace and dots.
pub fn first_name(full_name: &str) -> &str {
    full_name
        .split(|c: char| c.is_whitespace() || c == '.')
        .find(|segment| !segment.is_empty())
        .unwrap_or(full_name)
}

pub fn welcome(
    first_name: &str,
    email: &str,
    site_url: &str,
    brand_name: &str,
    year: i32,
) -> String {
    layout(
        &format!("Welcome to {}!", brand_name),
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>Your account <strong>{email}</strong> is ready. Jump in and start building your profile:</p>
<p style="text-align: center;"><a href="{site_url}" class="button">Get started</a></p>"#,
        ),
        brand_name,
        year,
    )
}

pub fn goodbye(first_name: &str, brand_name: &str, year: i32) -> String {
    layout(
        "Sorry to see you go",
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>Your {brand_name} account has been closed. Your data will be removed according to our retention policy.</p>
<p>If you change your mind, you are always welcome back.</p>"#,
        ),
        brand_name,
        year,
    )
}

pub fn application_received(
    first_name: &str,
    vacancy_title: &str,
    brand_name: &str,
    year: i32,
) -> String {
    layout(
        "Application received",
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>We received your application for <strong>{vacancy_title}</strong>. The hiring team will review it and get back to you.</p>"#,
        ),
        brand_name,
        year,
    )
}

pub fn interview_scheduled(
    first_name: &str,
    vacancy_title: &str,
    interview_link: &str,
    brand_name: &str,
    year: i32,
) -> String {
    layout(
        "Interview scheduled",
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>Your interview for <strong>{vacancy_title}</strong> has been scheduled.</p>
<p style="text-align: center;"><a href="{interview_link}" class="button">Join the interview</a></p>"#,
        ),
        brand_name,
        year,
    )
}

pub fn offer_extended(
    first_name: &str,
    vacancy_title: &str,
    offer_link: &str,
    brand_name: &str,
    year: i32,
) -> String {
    layout(
        "You have an offer!",
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>Congratulations! An offer for <strong>{vacancy_title}</strong> is waiting for you.</p>
<p style="text-align: center;"><a href="{offer_link}" class="button">View your offer</a></p>"#,
        ),
        brand_name,
        year,
    )
}

pub fn hired(first_name: &str, vacancy_title: &str, brand_name: &str, year: i32) -> String {
    layout(
        "Welcome aboard!",
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>Your hire for <strong>{vacancy_title}</strong> is confirmed. The team is looking forward to working with you.</p>"#,
        ),
        brand_name,
        year,
    )
}

pub fn rejected(first_name: &str, vacancy_title: &str, brand_name: &str, year: i32) -> String {
    layout(
        "About your application",
        &format!(
            r#"<p>Hi <strong>{first_name}</strong>,</p>
<p>Thank you for applying for <strong>{vacancy_title}</strong>. After careful review, the hiring team decided to move forward with other candidates.</p>
<p>We encourage you to apply to future openings.</p>"#,
        ),
        brand_name,
        year,
    )
}

fn layout(header: &str, body: &str, brand_name: &str, year: i32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #1b6ec2; color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0; }}
        .content {{ background-color: #f9f9f9; padding: 20px; border-radius: 0 0 5px 5px; }}
        .button {{ display: inline-block; background-color: #1b6ec2; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; margin: 20px 0; }}
        .footer {{ margin-top: 20px; padding-top: 20px; border-top: 1px solid #ddd; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{header}</h1>
        </div>
        <div class="content">
            {body}
            <div class="footer">
                <p>&copy; {year} {brand_name}. This is an automated message; please do not reply.</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_splits_on_whitespace_and_dots() {
        assert_eq!(first_name("Marina Silva"), "Marina");
        assert_eq!(first_name("joao.pereira"), "joao");
        assert_eq!(first_name("ana"), "ana");
        assert_eq!(first_name(".lead dot"), "lead");
    }

    #[test]
    fn welcome_interpolates_all_fields() {
        let html = welcome("Marina", "marina@example.com", "https://app.workhive.dev", "WorkHive", 2025);
        assert!(html.contains("Marina"));
        assert!(html.contains("marina@example.com"));
        assert!(html.contains("https://app.workhive.dev"));
        assert!(html.contains("WorkHive"));
        assert!(html.contains("2025"));
    }

    #[test]
    fn offer_extended_links_the_offer_document() {
        let html = offer_extended("Ana", "Backend Engineer", "https://docs/offer/1", "WorkHive", 2025);
        assert!(html.contains("Backend Engineer"));
        assert!(html.contains("https://docs/offer/1"));
    }
}
