use std::path::{Path, PathBuf};

/// Embedding of one reference face, tagged with who it belongs to.
///
/// `name` is the reference file's stem and may carry a disambiguating
/// suffix (`alice_front`); [`canonical_name`](Self::canonical_name) strips it.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityEncoding {
    vector: Vec<f32>,
    name: String,
    source: PathBuf,
}

impl IdentityEncoding {
    pub fn new(vector: Vec<f32>, name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            vector,
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn canonical_name(&self) -> &str {
        canonical_name(&self.name)
    }
}

/// Text before the first underscore; the whole name when there is none.
pub fn canonical_name(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}
