//! TOML deserialization structures for document definitions.
//!
//! These intermediate structures mirror the file layout and are converted into
//! [`DocumentSpec`] and [`Step`] values:
//!
//! ```toml
//! [document]
//! id = "lighthouse"
//! name = "Lighthouse Story"
//!
//! [[steps]]
//! key = "concept"
//! type = "text"
//! prompt = "Summarize: {user_prompt}"
//!
//! [[steps]]
//! key = "cover"
//! type = "image_batch"
//! prompt = "Cover for: {concept}"
//! count = 2
//! size = "1024x1792"
//! ```

use crate::{DocumentSpec, ImageSlot, Step, TableSpec, TextSlot};
use folio_core::Dimensions;
use folio_error::{DocumentError, DocumentErrorKind};
use serde::Deserialize;
use tracing::{debug, error, instrument};

/// Top-level file structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlDocumentFile {
    pub document: TomlDocument,
    #[serde(default)]
    pub steps: Vec<TomlStep>,
}

/// The `[document]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlDocument {
    pub id: String,
    pub name: String,
    /// Overrides the default system role
    pub system_role: Option<String>,
}

/// Step type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TomlStepType {
    Text,
    ImageBatch,
    TextBatch,
    Table,
}

/// One `[[steps]]` entry. Which fields apply depends on `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlStep {
    pub key: String,
    #[serde(rename = "type")]
    pub step_type: TomlStepType,
    pub prompt: Option<String>,
    pub system_role: Option<String>,

    /// Image batch shorthand: `count` numbered images at `size`
    pub count: Option<usize>,
    pub size: Option<String>,
    /// Image batch prefix applied to numbered images
    pub prefix: Option<String>,
    /// Image batch with individually configured slots
    #[serde(default)]
    pub images: Vec<TomlImage>,

    /// Text batch members
    #[serde(default)]
    pub members: Vec<TomlMember>,

    /// Table definition
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    pub total_column: Option<String>,
}

/// One `[[steps.images]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlImage {
    pub name: Option<String>,
    #[serde(default)]
    pub prefix: String,
    pub prompt: Option<String>,
    pub size: Option<String>,
}

/// One `[[steps.members]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlMember {
    pub name: String,
    pub prompt: String,
}

/// Parse a TOML document definition. Structural validation is left to
/// [`DocumentSpec::validate`].
#[instrument(skip(content), fields(content_len = content.len()))]
pub fn parse_document(content: &str) -> Result<DocumentSpec, DocumentError> {
    let file: TomlDocumentFile = toml::from_str(content).map_err(|e| {
        error!(error = %e, "Failed to parse document TOML");
        DocumentError::new(DocumentErrorKind::TomlParse(e.to_string()))
    })?;

    let steps = file
        .steps
        .into_iter()
        .map(TomlStep::into_step)
        .collect::<Result<Vec<_>, _>>()?;

    let mut spec = DocumentSpec::new(file.document.id, file.document.name, steps)?;
    if let Some(role) = file.document.system_role {
        spec = spec.with_system_role(role);
    }

    debug!(document = %spec.id(), steps = spec.steps().len(), "Parsed document definition");
    Ok(spec)
}

fn parse_size(size: Option<&str>) -> Result<Dimensions, DocumentError> {
    size.map(str::parse::<Dimensions>).transpose().map(Option::unwrap_or_default)
}

impl TomlStep {
    fn into_step(self) -> Result<Step, DocumentError> {
        let key = self.key;
        let step = match self.step_type {
            TomlStepType::Text => {
                let prompt = self
                    .prompt
                    .ok_or_else(|| DocumentError::new(DocumentErrorKind::EmptyPrompt(key.clone())))?;
                Step::text(key, prompt)
            }
            TomlStepType::ImageBatch => {
                let slots = if self.images.is_empty() {
                    let count = self.count.unwrap_or(0);
                    let prefix = self.prefix.unwrap_or_default();
                    ImageSlot::numbered(count, parse_size(self.size.as_deref())?)
                        .into_iter()
                        .map(|slot| slot.with_prefix(prefix.clone()))
                        .collect()
                } else {
                    if self.count.is_some() {
                        return Err(DocumentError::new(DocumentErrorKind::TomlParse(format!(
                            "step '{}' sets both 'count' and 'images'",
                            key
                        ))));
                    }
                    let default_size = parse_size(self.size.as_deref())?;
                    self.images
                        .into_iter()
                        .enumerate()
                        .map(|(i, image)| image.into_slot(i + 1, default_size))
                        .collect::<Result<Vec<_>, _>>()?
                };
                Step::image_slots(key, self.prompt.unwrap_or_default(), slots)
            }
            TomlStepType::TextBatch => {
                let members = self
                    .members
                    .into_iter()
                    .map(|member| TextSlot::new(member.name, member.prompt))
                    .collect();
                Step::text_batch(key, members)
            }
            TomlStepType::Table => {
                let mut table = TableSpec::new(self.columns, self.rows);
                if let Some(column) = self.total_column {
                    table = table.with_total_column(column);
                }
                Step::table(key, table)
            }
        };

        Ok(match self.system_role {
            Some(role) => step.with_system_role(role),
            None => step,
        })
    }
}

impl TomlImage {
    fn into_slot(self, position: usize, default_size: Dimensions) -> Result<ImageSlot, DocumentError> {
        let size = match self.size.as_deref() {
            Some(size) => size.parse()?,
            None => default_size,
        };
        let name = self
            .name
            .unwrap_or_else(|| format!("image_{}.png", position));
        let slot = ImageSlot::new(name, size).with_prefix(self.prefix);
        Ok(match self.prompt {
            Some(prompt) => slot.with_prompt(prompt),
            None => slot,
        })
    }
}
