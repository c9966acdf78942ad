use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::session::SessionKeys;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Success => f.write_str("success"),
            Level::Info => f.write_str("info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    messages: Vec<FlashMessage>,
    exp: usize,
    iss: String,
    aud: String,
}

fn pending(keys: &SessionKeys, jar: &CookieJar) -> Vec<FlashMessage> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    match keys.verify::<FlashClaims>(cookie.value()) {
        Ok(claims) => claims.messages,
        Err(e) => {
            warn!(error = %e, "dropping invalid flash cookie");
            Vec::new()
        }
    }
}

/// Queue a message for the next rendered page.
pub fn push(
    keys: &SessionKeys,
    jar: CookieJar,
    level: Level,
    text: impl Into<String>,
) -> anyhow::Result<CookieJar> {
    let mut messages = pending(keys, &jar);
    messages.push(FlashMessage {
        level,
        text: text.into(),
    });
    let (_, exp) = keys.expiry();
    let token = keys.sign(&FlashClaims {
        messages,
        exp,
        iss: keys.issuer.clone(),
        aud: keys.audience.clone(),
    })?;
    Ok(jar.add(keys.cookie(FLASH_COOKIE, token)))
}

/// Drain queued messages, clearing the cookie.
pub fn take(keys: &SessionKeys, jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = pending(keys, &jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (
        jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/")),
        messages,
    )
}
