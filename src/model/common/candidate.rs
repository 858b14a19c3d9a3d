use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Candidate IDs are generated object IDs.
pub type CandidateId = Id;

/// An option a voter may select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Candidate {
        pub fn example() -> Self {
            Self {
                id: Id::new(),
                name: "Alice".to_string(),
                description: Some("Wants longer lunch breaks".to_string()),
                image_url: None,
            }
        }

        pub fn example2() -> Self {
            Self {
                id: Id::new(),
                name: "Bob".to_string(),
                description: None,
                image_url: Some("https://example.com/bob.png".to_string()),
            }
        }
    }
}
