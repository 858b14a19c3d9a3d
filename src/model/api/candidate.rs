use serde::{Deserialize, Serialize};

use crate::model::common::ValidationError;

/// The admin-supplied fields of a new candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CandidateSpec {
    /// Trim every field, dropping blank optional ones.
    /// Fails if nothing is left of the name.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingCandidateName);
        }
        Ok(Self {
            name,
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
        })
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
