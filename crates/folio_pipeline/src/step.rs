//! Step definitions.
//!
//! A [`Step`] is one unit of generation work. Its output is stored in the run
//! context under [`Step::key`] and can be referenced by later templates as
//! `{key}`.

use crate::template;
use folio_core::Dimensions;
use serde::{Deserialize, Serialize};

/// One unit of generation work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Step {
    /// Key the output is stored under
    key: String,
    /// What the step does
    kind: StepKind,
    /// System role override for text calls
    system_role: Option<String>,
    /// Earlier keys referenced by this step's templates, in first-use order
    depends_on: Vec<String>,
}

/// The work a step performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// One text completion stored as a text artifact
    #[display("text")]
    Text {
        /// Prompt template
        prompt: String,
    },
    /// Image slots stored as a group of binary members
    #[display("image batch ({} images)", slots.len())]
    ImageBatch {
        /// Prompt template shared by every slot
        prompt: String,
        /// Slots in output order
        slots: Vec<ImageSlot>,
    },
    /// Several named text completions stored as a group of text members
    #[display("text batch ({} members)", members.len())]
    TextBatch {
        /// Members in output order
        members: Vec<TextSlot>,
    },
    /// A rendered table stored as CSV bytes; no remote call
    #[display("table ({} rows)", table.rows.len())]
    Table {
        /// Table definition
        table: TableSpec,
    },
}

/// One image within an image batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ImageSlot {
    /// Member name in the resulting group
    name: String,
    /// Text placed before the resolved prompt
    prefix: String,
    /// Template replacing the step's shared prompt for this slot
    prompt: Option<String>,
    /// Requested resolution
    size: Dimensions,
}

impl ImageSlot {
    /// A slot with no prefix and no prompt override.
    pub fn new(name: impl Into<String>, size: Dimensions) -> Self {
        Self {
            name: name.into(),
            prefix: String::new(),
            prompt: None,
            size,
        }
    }

    /// Set the text placed before the resolved prompt.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Use this template instead of the step's shared prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// `count` slots named `image_1.png` .. `image_{count}.png`, all at `size`.
    pub fn numbered(count: usize, size: Dimensions) -> Vec<Self> {
        (1..=count)
            .map(|n| Self::new(format!("image_{}.png", n), size))
            .collect()
    }
}

/// One named member of a text batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TextSlot {
    /// Member name in the resulting group
    name: String,
    /// Prompt template
    prompt: String,
}

impl TextSlot {
    /// Create a member.
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }
}

/// A static table whose cells are templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TableSpec {
    /// Header row
    columns: Vec<String>,
    /// Body rows; each must have one cell per column
    rows: Vec<Vec<String>>,
    /// Numeric column to sum into a trailing `Total` row
    total_column: Option<String>,
}

impl TableSpec {
    /// A table without a total row.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            total_column: None,
        }
    }

    /// Append a `Total` row summing `column`.
    pub fn with_total_column(mut self, column: impl Into<String>) -> Self {
        self.total_column = Some(column.into());
        self
    }
}

impl Step {
    fn from_kind(key: impl Into<String>, kind: StepKind) -> Self {
        let mut step = Self {
            key: key.into(),
            kind,
            system_role: None,
            depends_on: Vec::new(),
        };
        step.depends_on = template::placeholders_all(step.templates());
        step
    }

    /// A single text completion.
    pub fn text(key: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::from_kind(
            key,
            StepKind::Text {
                prompt: prompt.into(),
            },
        )
    }

    /// `count` images named `image_{n}.png`, all at `size`, sharing `prompt`.
    pub fn image_batch(
        key: impl Into<String>,
        prompt: impl Into<String>,
        count: usize,
        size: Dimensions,
    ) -> Self {
        Self::image_slots(key, prompt, ImageSlot::numbered(count, size))
    }

    /// Images with individually configured slots.
    pub fn image_slots(
        key: impl Into<String>,
        prompt: impl Into<String>,
        slots: Vec<ImageSlot>,
    ) -> Self {
        Self::from_kind(
            key,
            StepKind::ImageBatch {
                prompt: prompt.into(),
                slots,
            },
        )
    }

    /// Several named text completions.
    pub fn text_batch(key: impl Into<String>, members: Vec<TextSlot>) -> Self {
        Self::from_kind(key, StepKind::TextBatch { members })
    }

    /// A rendered table.
    pub fn table(key: impl Into<String>, table: TableSpec) -> Self {
        Self::from_kind(key, StepKind::Table { table })
    }

    /// Override the document's system role for this step's text calls.
    pub fn with_system_role(mut self, role: impl Into<String>) -> Self {
        self.system_role = Some(role.into());
        self
    }

    /// Every template this step resolves, in evaluation order.
    pub fn templates(&self) -> Vec<&str> {
        match &self.kind {
            StepKind::Text { prompt } => vec![prompt.as_str()],
            StepKind::ImageBatch { prompt, slots } => {
                let mut templates = vec![prompt.as_str()];
                templates.extend(slots.iter().filter_map(|slot| slot.prompt.as_deref()));
                templates
            }
            StepKind::TextBatch { members } => {
                members.iter().map(|member| member.prompt.as_str()).collect()
            }
            StepKind::Table { table } => table
                .rows
                .iter()
                .flat_map(|row| row.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Number of remote generations this step performs.
    pub fn unit_count(&self) -> usize {
        match &self.kind {
            StepKind::Text { .. } => 1,
            StepKind::ImageBatch { slots, .. } => slots.len(),
            StepKind::TextBatch { members } => members.len(),
            StepKind::Table { .. } => 0,
        }
    }

    /// Human-readable step name: underscores become spaces, extension dropped.
    ///
    /// ```
    /// use folio_pipeline::Step;
    ///
    /// assert_eq!(Step::text("character_designs", "x").label(), "character designs");
    /// ```
    pub fn label(&self) -> String {
        key_label(&self.key)
    }
}

/// Human-readable form of an artifact key.
pub fn key_label(key: &str) -> String {
    let stem = match key.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => key,
    };
    stem.replace('_', " ")
}
