use crate::form::is_valid_url;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Where a project's cover image comes from.
///
/// Stored as `{"kind": "url" | "embedded", "value": "..."}`. Older data that
/// kept a bare string is still accepted and classified by its `data:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageSource {
    /// A remote image referenced by URL.
    Url(String),
    /// An image inlined as a `data:` URL.
    Embedded(String),
}

impl ImageSource {
    const DATA_PREFIX: &'static str = "data:";

    /// Classifies a bare image string the way pre-tagged records were read.
    pub fn from_legacy(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with(Self::DATA_PREFIX) {
            Self::Embedded(value)
        } else {
            Self::Url(value)
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Url(v) | Self::Embedded(v) => v,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum TaggedImage {
    Url(String),
    Embedded(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageRepr {
    Tagged(TaggedImage),
    Legacy(String),
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ImageRepr::deserialize(deserializer)? {
            ImageRepr::Tagged(TaggedImage::Url(v)) => Self::Url(v),
            ImageRepr::Tagged(TaggedImage::Embedded(v)) => Self::Embedded(v),
            ImageRepr::Legacy(v) => Self::from_legacy(v),
        })
    }
}

/// A single portfolio project as persisted in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_url: Option<String>,
    #[serde(alias = "imageUrl")]
    pub image: ImageSource,
    pub created_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Checks the invariants every stored record must hold.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("empty id".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("empty title".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("empty description".to_string());
        }
        if self.technologies.is_empty() {
            return Err("no technologies".to_string());
        }
        if self.image.value().trim().is_empty() {
            return Err("missing image".to_string());
        }
        if !is_valid_url(&self.github_url) {
            return Err("invalid githubUrl".to_string());
        }
        let links = [("figmaUrl", &self.figma_url), ("deployUrl", &self.deploy_url)];
        for (name, link) in links {
            if link.as_deref().is_some_and(|url| !is_valid_url(url)) {
                return Err(format!("invalid {name}"));
            }
        }
        match &self.image {
            ImageSource::Url(url) if !is_valid_url(url) => Err("invalid image URL".to_string()),
            ImageSource::Embedded(data) if !data.starts_with("data:") => {
                Err("embedded image is not a data URL".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Fields supplied by the admin when creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github_url: String,
    pub figma_url: Option<String>,
    pub deploy_url: Option<String>,
    pub image: ImageSource,
}

/// Partial update merged over an existing record. `id` and `created_at`
/// cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub github_url: Option<String>,
    /// `Some(None)` clears the field.
    pub figma_url: Option<Option<String>>,
    /// `Some(None)` clears the field.
    pub deploy_url: Option<Option<String>>,
    pub image: Option<ImageSource>,
}

impl ProjectPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn apply(self, record: &mut ProjectRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(technologies) = self.technologies {
            record.technologies = technologies;
        }
        if let Some(github_url) = self.github_url {
            record.github_url = github_url;
        }
        if let Some(figma_url) = self.figma_url {
            record.figma_url = figma_url;
        }
        if let Some(deploy_url) = self.deploy_url {
            record.deploy_url = deploy_url;
        }
        if let Some(image) = self.image {
            record.image = image;
        }
    }
}

impl From<NewProject> for ProjectPatch {
    fn from(p: NewProject) -> Self {
        Self {
            title: Some(p.title),
            description: Some(p.description),
            technologies: Some(p.technologies),
            github_url: Some(p.github_url),
            figma_url: Some(p.figma_url),
            deploy_url: Some(p.deploy_url),
            image: Some(p.image),
        }
    }
}

/// A stored entry that could not be loaded as a valid record.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarantinedRecord {
    /// Position in the stored array.
    pub index: usize,
    pub reason: String,
    pub raw: serde_json::Value,
}
