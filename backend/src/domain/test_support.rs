//! Shared builders for domain unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{Email, Role, User, UserId, UserName};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Build a user with the given name and role; the email derives from the name.
pub(crate) fn user_with_role(name: &str, role: Role) -> User {
    let local: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    User {
        id: UserId::random(),
        name: UserName::new(name).expect("fixture name"),
        email: Email::new(format!("{local}@bank.example")).expect("fixture email"),
        role,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub(crate) fn admin_user(name: &str) -> User {
    user_with_role(name, Role::Admin)
}

pub(crate) fn advisor_user(name: &str) -> User {
    user_with_role(name, Role::Advisor)
}

struct FixtureClock(DateTime<Utc>);

impl mockable::Clock for FixtureClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.0.with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock frozen at `now`.
pub(crate) fn fixed_clock(now: DateTime<Utc>) -> std::sync::Arc<dyn mockable::Clock> {
    std::sync::Arc::new(FixtureClock(now))
}
