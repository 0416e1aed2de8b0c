use std::fmt;
use std::str::FromStr;

/// A hosted model version in `owner/name:version` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
    owner: String,
    name: String,
    version: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid model reference '{0}': expected owner/name:version")]
pub struct InvalidModelReference(pub String);

impl ModelReference {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl FromStr for ModelReference {
    type Err = InvalidModelReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidModelReference(s.to_string());

        let (model, version) = s.trim().split_once(':').ok_or_else(invalid)?;
        let (owner, name) = model.split_once('/').ok_or_else(invalid)?;

        if owner.is_empty() || name.is_empty() || version.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.name, self.version)
    }
}
