use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    config::Config,
    error::{Error, Result},
    model::api::{
        admin::AdminCredentials,
        auth::{AdminToken, AUTH_TOKEN_COOKIE},
    },
    store::SharedStore,
};

pub fn routes() -> Vec<Route> {
    routes![authenticate, logout]
}

#[post("/auth/admin", data = "<credentials>", format = "json")]
pub async fn authenticate(
    cookies: &CookieJar<'_>,
    credentials: Json<AdminCredentials>,
    store: &State<SharedStore>,
    config: &State<Config>,
) -> Result<()> {
    let valid = store
        .write(|store| store.admin_login(&credentials.password))
        .await?;
    if !valid {
        return Err(Error::unauthorized("Invalid password."));
    }

    cookies.add(AdminToken::new().into_cookie(config));
    Ok(())
}

/// Clear the cookie. If the caller really was the admin, also end the admin
/// session so that other copies of the token stop working.
#[delete("/auth")]
pub async fn logout(
    token: Option<AdminToken>,
    cookies: &CookieJar<'_>,
    store: &State<SharedStore>,
) -> Result<Status> {
    if token.is_some() {
        store.write(|store| store.admin_logout()).await?;
    }
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Ok(Status::Ok)
}
