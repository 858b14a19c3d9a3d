use reqwest::StatusCode;

use crate::client::{ApiClient, ClientError};
use crate::store::{VotingStore, DEFAULT_ADMIN_PASSWORD};

/// Shown on a failed login while the default password is still configured.
pub const DEFAULT_PASSWORD_HINT: &str = "Invalid password. Try \"admin123\"";

pub const INVALID_PASSWORD: &str = "Invalid password.";

/// The admin login form.
#[derive(Debug, Clone, Default)]
pub struct AdminLogin {
    password: String,
    error: Option<String>,
    show_hint: bool,
}

impl AdminLogin {
    /// A blank form. With `show_hint`, failures tell the user the default
    /// password.
    pub fn new(show_hint: bool) -> Self {
        Self {
            show_hint,
            ..Default::default()
        }
    }

    /// A blank form for logging in to `store`.
    pub fn for_store(store: &VotingStore) -> Self {
        Self::new(store.settings().admin_password == DEFAULT_ADMIN_PASSWORD)
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log in against a local store.
    pub fn submit(&mut self, store: &mut VotingStore) -> bool {
        let accepted = store.admin_login(&self.password);
        self.finish(accepted);
        accepted
    }

    /// Log in through the API.
    pub async fn submit_remote(&mut self, client: &ApiClient) -> bool {
        match client.login(&self.password).await {
            Ok(()) => {
                self.finish(true);
                true
            }
            Err(ClientError::Server { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                self.finish(false);
                false
            }
            Err(e) => {
                self.password.clear();
                self.error = Some(e.message());
                false
            }
        }
    }

    fn finish(&mut self, accepted: bool) {
        self.password.clear();
        self.error = if accepted {
            None
        } else if self.show_hint {
            Some(DEFAULT_PASSWORD_HINT.to_string())
        } else {
            Some(INVALID_PASSWORD.to_string())
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::model::db::VotingState;
    use crate::store::StoreSettings;

    use super::*;

    fn store(password: &str) -> VotingStore {
        VotingStore::new(
            VotingState::default(),
            StoreSettings {
                admin_password: password.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn correct_password() {
        let mut store = store(DEFAULT_ADMIN_PASSWORD);
        let mut login = AdminLogin::for_store(&store);
        login.set_password("admin123");

        assert!(login.submit(&mut store));
        assert_eq!(None, login.error());
        assert!(store.is_admin_logged_in());
    }

    #[test]
    fn wrong_password_hints_default() {
        let mut store = store(DEFAULT_ADMIN_PASSWORD);
        let mut login = AdminLogin::for_store(&store);
        login.set_password("letmein");

        assert!(!login.submit(&mut store));
        assert_eq!(Some(DEFAULT_PASSWORD_HINT), login.error());
        assert!(!store.is_admin_logged_in());
    }

    #[test]
    fn wrong_password_without_hint() {
        let mut store = store("s3cret");
        let mut login = AdminLogin::for_store(&store);
        login.set_password("admin123");

        assert!(!login.submit(&mut store));
        assert_eq!(Some(INVALID_PASSWORD), login.error());
    }

    #[test]
    fn retry_clears_error() {
        let mut store = store(DEFAULT_ADMIN_PASSWORD);
        let mut login = AdminLogin::for_store(&store);
        login.set_password("nope");
        login.submit(&mut store);
        assert!(login.error().is_some());

        login.set_password("admin123");
        assert!(login.submit(&mut store));
        assert_eq!(None, login.error());
    }

    #[rocket::async_test]
    async fn unreachable_api() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut login = AdminLogin::new(true);
        login.set_password("admin123");

        assert!(!login.submit_remote(&client).await);
        assert_eq!(
            Some(crate::client::GENERIC_ERROR_MESSAGE),
            login.error()
        );
    }
}
