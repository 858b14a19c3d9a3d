use serde::{Deserialize, Serialize};

/// Raw admin credentials, received from a user. The password is only ever
/// compared, never stored.
#[derive(Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub password: String,
}

#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCredentials {
        pub fn example() -> Self {
            Self {
                password: "admin123".into(),
            }
        }

        pub fn wrong() -> Self {
            Self {
                password: "hunter2".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                password: "".into(),
            }
        }
    }
}
