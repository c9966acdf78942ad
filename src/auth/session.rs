use std::convert::Infallible;
use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::SessionConfig, error::AppError, state::AppState};

pub const SESSION_COOKIE: &str = "session";

/// Payload of the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // username
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Signing material for every cookie the app issues.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.session)
    }
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
            secure: cfg.cookie_secure,
        }
    }

    pub(crate) fn expiry(&self) -> (usize, usize) {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        (now.unix_timestamp() as usize, exp.unix_timestamp() as usize)
    }

    pub(crate) fn sign<T: Serialize>(&self, claims: &T) -> anyhow::Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    pub(crate) fn verify<T: DeserializeOwned>(&self, token: &str) -> anyhow::Result<T> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        Ok(decode::<T>(token, &self.decoding, &validation)?.claims)
    }

    pub fn sign_session(&self, username: &str) -> anyhow::Result<String> {
        let (iat, exp) = self.expiry();
        let claims = SessionClaims {
            sub: username.to_string(),
            iat,
            exp,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = self.sign(&claims)?;
        debug!(%username, "session signed");
        Ok(token)
    }

    pub fn verify_session(&self, token: &str) -> anyhow::Result<SessionClaims> {
        self.verify(token)
    }

    pub(crate) fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Store `username` in the session cookie.
    pub fn login(&self, jar: CookieJar, username: &str) -> anyhow::Result<CookieJar> {
        let token = self.sign_session(username)?;
        Ok(jar.add(self.cookie(SESSION_COOKIE, token)))
    }

    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
    }

    /// Username from a valid session cookie, if any.
    pub fn current_username(&self, jar: &CookieJar) -> Option<String> {
        let cookie = jar.get(SESSION_COOKIE)?;
        match self.verify_session(cookie.value()) {
            Ok(claims) => Some(claims.sub),
            Err(e) => {
                warn!(error = %e, "ignoring invalid session cookie");
                None
            }
        }
    }
}

/// The username held by the request's session, if it has one.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    pub fn username(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Succeeds only when the session belongs to `owner`.
    pub fn require_owner(&self, owner: &str) -> Result<&str, AppError> {
        match self.username() {
            Some(name) if name == owner => Ok(name),
            Some(name) => {
                warn!(session = %name, %owner, "session does not own resource");
                Err(AppError::Unauthorized)
            }
            None => Err(AppError::Unauthorized),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(CurrentUser(keys.current_username(&jar)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> SessionKeys {
        SessionKeys::new(&SessionConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
            cookie_secure: false,
        })
    }

    #[test]
    fn sign_and_verify_session() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.sign_session("testuser").expect("sign session");
        let claims = keys.verify_session(&token).expect("verify session");
        assert_eq!(claims.sub, "testuser");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_other_secret() {
        let good = make_keys("secret-a", "iss", "aud");
        let bad = make_keys("secret-b", "iss", "aud");
        let token = good.sign_session("testuser").expect("sign session");
        assert!(bad.verify_session(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.sign_session("testuser").expect("sign session");
        assert!(bad.verify_session(&token).is_err());
    }

    #[test]
    fn login_cookie_round_trips_through_jar() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let jar = keys.login(CookieJar::new(), "testuser").expect("login");
        assert_eq!(keys.current_username(&jar).as_deref(), Some("testuser"));

        let jar = keys.logout(jar);
        assert_eq!(keys.current_username(&jar), None);
    }

    #[test]
    fn tampered_cookie_is_no_session() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "garbage"));
        assert_eq!(keys.current_username(&jar), None);
    }

    #[test]
    fn require_owner_checks_identity() {
        let user = CurrentUser(Some("alice".into()));
        assert_eq!(user.require_owner("alice").expect("owner"), "alice");
        assert!(matches!(
            user.require_owner("bob"),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            CurrentUser(None).require_owner("alice"),
            Err(AppError::Unauthorized)
        ));
    }
}
