//! Editable project draft and its validation rules.
//!
//! A [`ProjectForm`] collects every field the admin can edit. Validation runs
//! all rules independently and keeps every violation, keyed by [`Field`], so a
//! front end can show them next to the offending inputs. Validation failures
//! are values, never errors.

use crate::error::{Error, Result};
use crate::image::{is_image_mime, mime_type_for, read_as_data_url};
use crate::models::{ImageSource, NewProject, ProjectRecord};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    Technologies,
    GithubUrl,
    FigmaUrl,
    DeployUrl,
    ImageUrl,
    ImageFile,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Technologies => "technologies",
            Field::GithubUrl => "githubUrl",
            Field::FigmaUrl => "figmaUrl",
            Field::DeployUrl => "deployUrl",
            Field::ImageUrl => "imageUrl",
            Field::ImageFile => "imageFile",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level rejection reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        f.write_str(&parts.join("; "))
    }
}

const REJECTED_FILE: &str = "Please select an image file";

/// Well-formed per the WHATWG URL parser.
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    Url,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileImage {
    /// A local file picked in this editing session.
    Selected { path: PathBuf, mime: String },
    /// An inlined image carried over from the record being edited.
    Embedded(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Url(String),
    File(Option<FileImage>),
}

/// Result of [`ProjectForm::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Ready(NewProject),
    Invalid(ValidationErrors),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub github_url: String,
    pub figma_url: String,
    pub deploy_url: String,
    technologies: Vec<String>,
    image: ImageInput,
    preview: Option<String>,
    /// Set when the last file picked was not an image.
    rejected_file: bool,
    errors: ValidationErrors,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            github_url: String::new(),
            figma_url: String::new(),
            deploy_url: String::new(),
            technologies: Vec::new(),
            image: ImageInput::Url(String::new()),
            preview: None,
            rejected_file: false,
            errors: ValidationErrors::default(),
        }
    }

    /// Prefills the form from an existing record. The image mode follows the
    /// record's image kind.
    pub fn from_record(record: &ProjectRecord) -> Self {
        let image = match &record.image {
            ImageSource::Url(url) => ImageInput::Url(url.clone()),
            ImageSource::Embedded(data) => ImageInput::File(Some(FileImage::Embedded(data.clone()))),
        };
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            github_url: record.github_url.clone(),
            figma_url: record.figma_url.clone().unwrap_or_default(),
            deploy_url: record.deploy_url.clone().unwrap_or_default(),
            technologies: record.technologies.clone(),
            image,
            preview: Some(record.image.value().to_string()),
            rejected_file: false,
            errors: ValidationErrors::default(),
        }
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    /// Adds a trimmed technology. Empty input and duplicates are ignored.
    pub fn add_technology(&mut self, input: &str) -> bool {
        let tech = input.trim();
        if tech.is_empty() || self.technologies.iter().any(|t| t == tech) {
            return false;
        }
        self.technologies.push(tech.to_string());
        true
    }

    pub fn remove_technology(&mut self, tech: &str) -> bool {
        let before = self.technologies.len();
        self.technologies.retain(|t| t != tech);
        self.technologies.len() != before
    }

    pub fn image(&self) -> &ImageInput {
        &self.image
    }

    pub fn image_mode(&self) -> ImageMode {
        match self.image {
            ImageInput::Url(_) => ImageMode::Url,
            ImageInput::File(_) => ImageMode::File,
        }
    }

    /// Switches image mode. Leaving URL mode drops the typed URL; leaving
    /// File mode drops the selected file.
    pub fn set_image_mode(&mut self, mode: ImageMode) {
        if self.image_mode() == mode {
            return;
        }
        self.image = match mode {
            ImageMode::Url => ImageInput::Url(String::new()),
            ImageMode::File => ImageInput::File(None),
        };
        self.clear_image_errors();
    }

    /// Sets the image URL, switching to URL mode if needed.
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !url.is_empty() {
            self.preview = Some(url.clone());
        }
        self.image = ImageInput::Url(url);
        self.clear_image_errors();
    }

    /// Selects a local image file, switching to File mode if needed.
    ///
    /// Non-image files are rejected at once with an `imageFile` error that
    /// stays until another file or an image URL is chosen; the previous
    /// selection is kept but cannot be submitted meanwhile. On success the file is read into the
    /// preview; a failed read only clears the preview.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mime = mime_type_for(path);
        if !is_image_mime(mime) {
            self.errors.insert(Field::ImageFile, REJECTED_FILE);
            self.rejected_file = true;
            return false;
        }
        self.image = ImageInput::File(Some(FileImage::Selected {
            path: path.to_path_buf(),
            mime: mime.to_string(),
        }));
        self.clear_image_errors();
        self.preview = match read_as_data_url(path, mime) {
            Ok(data_url) => Some(data_url),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Could not read image preview.");
                None
            }
        };
        true
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn clear_image_errors(&mut self) {
        self.rejected_file = false;
        self.errors.remove(Field::ImageUrl);
        self.errors.remove(Field::ImageFile);
    }

    /// Runs every rule and replaces the stored errors. Returns `true` when the
    /// draft is valid.
    pub fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::default();

        if self.title.trim().is_empty() {
            errors.insert(Field::Title, "Title is required");
        }
        if self.description.trim().is_empty() {
            errors.insert(Field::Description, "Description is required");
        }
        if self.technologies.is_empty() {
            errors.insert(Field::Technologies, "Add at least one technology");
        }
        if self.github_url.trim().is_empty() {
            errors.insert(Field::GithubUrl, "GitHub URL is required");
        } else if !is_valid_url(&self.github_url) {
            errors.insert(Field::GithubUrl, "Invalid URL");
        }
        if !self.figma_url.is_empty() && !is_valid_url(&self.figma_url) {
            errors.insert(Field::FigmaUrl, "Invalid URL");
        }
        if !self.deploy_url.is_empty() && !is_valid_url(&self.deploy_url) {
            errors.insert(Field::DeployUrl, "Invalid URL");
        }

        match &self.image {
            ImageInput::Url(url) if url.trim().is_empty() => {
                errors.insert(Field::ImageUrl, "Image URL is required");
            }
            ImageInput::Url(url) if !is_valid_url(url) => {
                errors.insert(Field::ImageUrl, "Invalid URL");
            }
            ImageInput::Url(_) => {}
            ImageInput::File(None) => {
                errors.insert(Field::ImageFile, "Select an image file");
            }
            ImageInput::File(Some(_)) => {}
        }
        if self.rejected_file {
            errors.insert(Field::ImageFile, REJECTED_FILE);
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validates and, if valid, builds the project to store. A selected file
    /// is read and inlined as a `data:` URL; empty optional links become
    /// `None`.
    pub fn submit(&mut self) -> Result<Submission> {
        if !self.validate() {
            return Ok(Submission::Invalid(self.errors.clone()));
        }

        let image = match &self.image {
            ImageInput::Url(url) => ImageSource::Url(url.clone()),
            ImageInput::File(Some(FileImage::Selected { path, mime })) => {
                ImageSource::Embedded(read_as_data_url(path, mime)?)
            }
            ImageInput::File(Some(FileImage::Embedded(data))) => ImageSource::Embedded(data.clone()),
            ImageInput::File(None) => {
                return Err(Error::InvalidState("file mode without a file passed validation".into()));
            }
        };

        Ok(Submission::Ready(NewProject {
            title: self.title.clone(),
            description: self.description.clone(),
            technologies: self.technologies.clone(),
            github_url: self.github_url.clone(),
            figma_url: non_empty(&self.figma_url),
            deploy_url: non_empty(&self.deploy_url),
            image,
        }))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technologies_are_trimmed_and_deduplicated() {
        let mut form = ProjectForm::new();
        assert!(form.add_technology("  Rust "));
        assert!(!form.add_technology("Rust"));
        assert!(!form.add_technology("   "));
        assert!(form.add_technology("Tokio"));
        assert_eq!(form.technologies(), ["Rust", "Tokio"]);
        assert!(form.remove_technology("Rust"));
        assert!(!form.remove_technology("Rust"));
    }

    #[test]
    fn url_check_matches_browser_parser() {
        assert!(is_valid_url("https://github.com/a/b"));
        assert!(is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("github.com/a/b"));
    }

    #[test]
    fn switching_modes_clears_the_other_input() {
        let mut form = ProjectForm::new();
        form.set_image_url("https://example.com/a.png");
        form.set_image_mode(ImageMode::File);
        assert_eq!(form.image(), &ImageInput::File(None));
        form.set_image_mode(ImageMode::Url);
        assert_eq!(form.image(), &ImageInput::Url(String::new()));
    }

    #[test]
    fn display_joins_all_errors() {
        let mut errors = ValidationErrors::default();
        errors.insert(Field::Title, "Title is required");
        errors.insert(Field::GithubUrl, "Invalid URL");
        assert_eq!(errors.to_string(), "title: Title is required; githubUrl: Invalid URL");
    }
}
