use rocket::{http::Status, response::status::Custom, serde::json::Json, Catcher, Request, Route};

use crate::model::api::{auth::AuthFailure, error::ErrorMessage};

mod admin;
mod auth;
mod public;
mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(public::routes());
    routes.extend(auth::routes());
    routes.extend(voter::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Give errors raised outside of a route (failed guards, unmatched paths,
/// malformed bodies) the same `{message}` body as route errors.
#[catch(default)]
fn default_catcher(status: Status, req: &Request) -> Custom<Json<ErrorMessage>> {
    let message = match status.code {
        400 => "Bad request",
        401 => AuthFailure::message(req).unwrap_or("Admin login required"),
        404 => "Not found",
        409 => "Conflict",
        422 => "Malformed request body",
        500 => "Something went wrong on the server",
        _ => status.reason_lossy(),
    };
    Custom(status, Json(ErrorMessage::new(message)))
}
