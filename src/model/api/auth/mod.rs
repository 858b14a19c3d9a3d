mod token;

pub use token::{AdminToken, AuthFailure, AUTH_TOKEN_COOKIE};
