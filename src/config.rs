use chrono::Duration;
use log::{error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::store::{
    MemoryRepository, MongoRepository, SharedStore, StoreSettings, DEFAULT_ADMIN_PASSWORD,
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    #[serde(default)]
    demo_voter_lookup: bool,
    // secrets
    #[serde(default = "default_admin_password")]
    admin_password: String,
    jwt_secret: String,
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

impl Config {
    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Is the admin password still the well-known default?
    pub fn default_password_in_use(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }

    /// The store behaviour this config asks for.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            admin_password: self.admin_password.clone(),
            demo_voter_lookup: self.demo_voter_lookup,
        }
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if config.default_password_in_use() {
            warn!("Admin password is the default; set ROCKET_ADMIN_PASSWORD");
        }

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the storage backend.
#[derive(Deserialize)]
struct StorageConfig {
    #[serde(default = "default_db_name")]
    db_name: String,
    // secrets
    db_uri: Option<String>,
}

fn default_db_name() -> String {
    "votebox".to_string()
}

/// A fairing that picks the storage backend, loads the voting state from it,
/// and places a [`SharedStore`] into managed state.
///
/// With a `db_uri` the state lives in MongoDB; without one it only lives in
/// memory. This fairing depends on [`Config`] being in managed state, and so
/// must be attached after [`ConfigFairing`].
pub struct StorageFairing;

#[rocket::async_trait]
impl Fairing for StorageFairing {
    fn info(&self) -> Info {
        Info {
            name: "Voting storage",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StorageConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load storage config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        let settings = match rocket.state::<Config>() {
            Some(app_config) => app_config.store_settings(),
            None => {
                error!("Application config was not available when loading storage");
                return Err(rocket);
            }
        };

        let loaded = match config.db_uri {
            Some(db_uri) => {
                info!("Loaded storage config, connecting to database...");
                let client = match MongoClient::with_uri_str(db_uri).await {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                };
                let db = client.database(&config.db_name);
                SharedStore::load(MongoRepository::new(&db), settings).await
            }
            None => {
                warn!("No `db_uri` configured; voting data will not survive a restart");
                SharedStore::load(MemoryRepository::default(), settings).await
            }
        };

        match loaded {
            Ok(store) => {
                info!("...voting state loaded!");
                Ok(rocket.manage(store))
            }
            Err(e) => {
                error!("Failed to load voting state: {e}");
                Err(rocket)
            }
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self {
                auth_ttl: 3600,
                demo_voter_lookup: false,
                admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
                jwt_secret: "test-jwt-secret".to_string(),
            }
        }

        pub fn example_with_demo_lookup() -> Self {
            Self {
                demo_voter_lookup: true,
                ..Self::example()
            }
        }
    }
}
