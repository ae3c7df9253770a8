//! HTML templates.

use askama::Template;
use chrono::{DateTime, Utc};

use gatehouse_entity::Session;

/// Landing page: greets a logged-in user or offers the login link.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub authorized: bool,
    pub user: String,
    pub provider: String,
    pub login_path: &'static str,
}

impl IndexTemplate {
    pub fn for_session(session: &Session, now: DateTime<Utc>, provider: &str) -> Self {
        let authorized = session.is_authorized_at(now);
        Self {
            title: "Gatehouse".to_string(),
            authorized,
            user: if authorized {
                session.user.clone()
            } else {
                String::new()
            },
            provider: provider_label(provider),
            login_path: "/oauth",
        }
    }
}

fn provider_label(provider: &str) -> String {
    match provider {
        "github" => "GitHub".to_string(),
        other => other.to_string(),
    }
}
