use std::fmt::{Display, Formatter};

use crate::model::{
    api::candidate::CandidateSpec,
    common::{Candidate, ValidationError},
};

/// The "add candidate" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateForm {
    pub name: String,
    pub description: String,
    pub image_url: String,
    error: Option<ValidationError>,
}

impl CandidateForm {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image_url: image_url.into(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    /// Turn the form into a candidate spec, clearing it on success. On
    /// failure the form keeps its contents and records the error.
    pub fn submit(&mut self) -> Option<CandidateSpec> {
        let spec = CandidateSpec {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            image_url: Some(self.image_url.clone()),
        };
        match spec.normalized() {
            Ok(spec) => {
                *self = Self::default();
                Some(spec)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

/// The candidate list as text, one candidate per line with its id.
pub struct CandidateList<'a>(pub &'a [Candidate]);

impl Display for CandidateList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No candidates added yet");
        }

        for candidate in self.0 {
            write!(f, "{}  {}", candidate.id, candidate.name)?;
            if let Some(description) = &candidate.description {
                write!(f, " - {description}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
