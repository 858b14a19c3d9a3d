use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, SameSite},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::store::SharedStore;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Subject claim carried by every admin token.
const ADMIN_SUBJECT: &str = "admin";

/// An authentication token proving the bearer logged in with the admin password.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminToken {
    sub: String,
}

impl AdminToken {
    /// Create a new [`AdminToken`]. Only call this after checking the password.
    pub fn new() -> Self {
        Self {
            sub: ADMIN_SUBJECT.to_string(),
        }
    }

    /// Serialize this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings");

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        if token.sub != ADMIN_SUBJECT {
            return Err(Error::unauthorized("Admin login required"));
        }
        Ok(token)
    }
}

impl Default for AdminToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AdminToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

/// Why the [`AdminToken`] guard refused a request. Catchers cannot see guard
/// errors, so the message is left in the request-local cache for them.
#[derive(Debug, Default)]
pub struct AuthFailure(Option<String>);

impl AuthFailure {
    /// The message recorded for this request, if the admin guard failed.
    pub fn message<'r>(req: &'r Request<'_>) -> Option<&'r str> {
        req.local_cache(AuthFailure::default).0.as_deref()
    }

    fn outcome<S>(req: &Request<'_>, error: Error) -> Outcome<S, Error> {
        let (status, message) = error.status_and_message();
        req.local_cache(|| AuthFailure(Some(message)));
        Outcome::Failure((status, error))
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = Error;

    /// Get an [`AdminToken`] from the cookie, and check the admin is still
    /// logged in; a logout anywhere ends every admin session.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwraps are safe as `Config` and `SharedStore` are always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();
        let store = req.guard::<&State<SharedStore>>().await.unwrap();

        let cookie = match req.cookies().get(AUTH_TOKEN_COOKIE) {
            Some(cookie) => cookie,
            None => {
                return AuthFailure::outcome(req, Error::unauthorized("Admin login required"))
            }
        };

        let token = match Self::from_cookie(cookie, config) {
            Ok(token) => token,
            Err(e) => return AuthFailure::outcome(req, e),
        };

        if store.read(|store| store.is_admin_logged_in()).await {
            Outcome::Success(token)
        } else {
            AuthFailure::outcome(req, Error::unauthorized("Admin session has ended"))
        }
    }
}
