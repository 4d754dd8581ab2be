//! Document definitions: an ordered list of steps plus display metadata.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use crate::template::is_placeholder_key;
use crate::{Step, StepKind};
use folio_core::{MASTER_DOCUMENT_KEY, USER_PROMPT_KEY, is_reserved_key};
use folio_error::{DocumentError, DocumentErrorKind};
use tracing::{debug, instrument};

/// An immutable document type: identifier, display name, system role and steps.
///
/// Construction rejects empty step lists, duplicate keys and reserved keys.
/// [`validate`](Self::validate) additionally checks that every template only
/// references earlier steps or the user prompt, and that batch and table steps
/// are well formed.
///
/// # Examples
///
/// ```
/// use folio_core::Dimensions;
/// use folio_pipeline::{DocumentSpec, Step};
///
/// let spec = DocumentSpec::new(
///     "lighthouse",
///     "Lighthouse Story",
///     vec![
///         Step::text("concept", "Summarize: {user_prompt}"),
///         Step::text("plot", "Plot from: {concept}"),
///         Step::image_batch("cover", "Cover for: {plot}", 1, Dimensions::SQUARE),
///     ],
/// )
/// .unwrap();
///
/// spec.validate().unwrap();
/// assert_eq!(spec.step_keys(), vec!["concept", "plot", "cover"]);
/// assert_eq!(
///     spec.system_role(),
///     "You are a helpful assistant specializing in Lighthouse Story."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct DocumentSpec {
    /// Identifier, also the suggested archive file stem
    id: String,
    /// Display name
    name: String,
    /// System role sent with every text call unless a step overrides it
    system_role: String,
    /// Steps in execution order
    steps: Vec<Step>,
}

impl DocumentSpec {
    /// Create a document with the default system role.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` is empty, any key is duplicated, reserved
    /// or not a valid placeholder key, a batch member name is not a plain file
    /// name, or two steps would flatten to the same archive entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self, DocumentError> {
        let id = id.into();
        let name = name.into();

        if steps.is_empty() {
            return Err(DocumentError::new(DocumentErrorKind::EmptySteps(id)));
        }

        let mut seen = HashSet::new();
        let mut entries = HashSet::from([format!("{}.txt", MASTER_DOCUMENT_KEY)]);
        for step in &steps {
            let key = step.key();
            if is_reserved_key(key) {
                return Err(DocumentError::new(DocumentErrorKind::ReservedKey(key.clone())));
            }
            if !is_placeholder_key(key) {
                return Err(invalid_name(
                    key,
                    "keys use letters, digits, '_', '.' and '-', and cannot start with '.' or '-'",
                ));
            }
            if !seen.insert(key.as_str()) {
                return Err(DocumentError::new(DocumentErrorKind::DuplicateKey(key.clone())));
            }
            for member in member_names(step.kind()) {
                check_member_name(key, member)?;
            }
            let entry = top_level_entry(step);
            if !entries.insert(entry.clone()) {
                return Err(DocumentError::new(DocumentErrorKind::EntryCollision(entry)));
            }
        }

        let system_role = default_system_role(&name);
        Ok(Self {
            id,
            name,
            system_role,
            steps,
        })
    }

    /// Replace the document-wide system role.
    pub fn with_system_role(mut self, role: impl Into<String>) -> Self {
        self.system_role = role.into();
        self
    }

    /// Load and validate a TOML definition from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocumentError::new(DocumentErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        content.parse()
    }

    /// Step keys in execution order.
    pub fn step_keys(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.key().as_str()).collect()
    }

    /// Look up a step by key.
    pub fn step(&self, key: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.key() == key)
    }

    /// System role for a step's text calls.
    pub fn system_role_for<'a>(&'a self, step: &'a Step) -> &'a str {
        step.system_role().as_deref().unwrap_or(&self.system_role)
    }

    /// Check structural rules that construction does not.
    ///
    /// # Errors
    ///
    /// - [`DocumentErrorKind::ForwardReference`] when a template names itself,
    ///   a later step, or an unknown key
    /// - [`DocumentErrorKind::EmptyPrompt`] for blank prompt templates
    /// - [`DocumentErrorKind::EmptyBatch`] for batches without slots
    /// - [`DocumentErrorKind::InvalidTable`] for ragged tables or an unknown
    ///   total column
    /// - [`DocumentErrorKind::DuplicateKey`] for repeated member names in a batch
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut available: HashSet<&str> = HashSet::from([USER_PROMPT_KEY]);

        for step in &self.steps {
            let key = step.key().as_str();
            for dependency in step.depends_on() {
                if !available.contains(dependency.as_str()) {
                    return Err(DocumentError::new(DocumentErrorKind::ForwardReference {
                        step: key.to_string(),
                        key: dependency.clone(),
                    }));
                }
            }
            validate_kind(key, step.kind())?;
            available.insert(key);
        }

        debug!(document = %self.id, steps = self.steps.len(), "Document validated");
        Ok(())
    }
}

impl FromStr for DocumentSpec {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = crate::toml_parser::parse_document(s)?;
        spec.validate()?;
        Ok(spec)
    }
}

/// `"You are a helpful assistant specializing in {name}."`
pub fn default_system_role(name: &str) -> String {
    format!("You are a helpful assistant specializing in {}.", name)
}

fn validate_kind(key: &str, kind: &StepKind) -> Result<(), DocumentError> {
    let empty_prompt = || DocumentError::new(DocumentErrorKind::EmptyPrompt(key.to_string()));
    let empty_batch = || DocumentError::new(DocumentErrorKind::EmptyBatch(key.to_string()));

    match kind {
        StepKind::Text { prompt } => {
            if prompt.trim().is_empty() {
                return Err(empty_prompt());
            }
        }
        StepKind::ImageBatch { prompt, slots } => {
            if slots.is_empty() {
                return Err(empty_batch());
            }
            let all_overridden = slots.iter().all(|slot| slot.prompt().is_some());
            if prompt.trim().is_empty() && !all_overridden {
                return Err(empty_prompt());
            }
            if slots
                .iter()
                .any(|slot| slot.prompt().as_deref().is_some_and(|p| p.trim().is_empty()))
            {
                return Err(empty_prompt());
            }
            unique_names(key, slots.iter().map(|slot| slot.name().as_str()))?;
        }
        StepKind::TextBatch { members } => {
            if members.is_empty() {
                return Err(empty_batch());
            }
            if members.iter().any(|member| member.prompt().trim().is_empty()) {
                return Err(empty_prompt());
            }
            unique_names(key, members.iter().map(|member| member.name().as_str()))?;
        }
        StepKind::Table { table } => {
            let invalid = |message: String| {
                DocumentError::new(DocumentErrorKind::InvalidTable {
                    step: key.to_string(),
                    message,
                })
            };
            if table.columns().is_empty() {
                return Err(invalid("table has no columns".to_string()));
            }
            if let Some((index, row)) = table
                .rows()
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != table.columns().len())
            {
                return Err(invalid(format!(
                    "row {} has {} cells, expected {}",
                    index + 1,
                    row.len(),
                    table.columns().len()
                )));
            }
            if let Some(column) = table.total_column() {
                if !table.columns().contains(column) {
                    return Err(invalid(format!("unknown total column '{}'", column)));
                }
            }
        }
    }
    Ok(())
}

fn unique_names<'a>(key: &str, names: impl Iterator<Item = &'a str>) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DocumentError::new(DocumentErrorKind::DuplicateKey(format!(
                "{}/{}",
                key, name
            ))));
        }
    }
    Ok(())
}

fn invalid_name(name: &str, reason: &str) -> DocumentError {
    DocumentError::new(DocumentErrorKind::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

fn member_names(kind: &StepKind) -> Vec<&str> {
    match kind {
        StepKind::ImageBatch { slots, .. } => slots.iter().map(|slot| slot.name().as_str()).collect(),
        StepKind::TextBatch { members } => {
            members.iter().map(|member| member.name().as_str()).collect()
        }
        StepKind::Text { .. } | StepKind::Table { .. } => Vec::new(),
    }
}

/// Member names become `{key}/{name}` archive entries and must stay inside that directory.
fn check_member_name(key: &str, name: &str) -> Result<(), DocumentError> {
    let reason = if name.trim().is_empty() {
        Some("member names cannot be blank")
    } else if name.contains(['/', '\\']) {
        Some("member names cannot contain path separators")
    } else if name == "." || name == ".." {
        Some("member names cannot be '.' or '..'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(invalid_name(&format!("{}/{}", key, name), reason)),
        None => Ok(()),
    }
}

/// The file or directory a step occupies at the archive root.
fn top_level_entry(step: &Step) -> String {
    match step.kind() {
        StepKind::Text { .. } => format!("{}.txt", step.key()),
        StepKind::Table { .. } | StepKind::ImageBatch { .. } | StepKind::TextBatch { .. } => {
            step.key().clone()
        }
    }
}
