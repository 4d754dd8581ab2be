//! Per-run artifact accumulator.

use crate::Artifact;
use indexmap::IndexMap;

/// Key under which the caller's prompt seeds every run context.
pub const USER_PROMPT_KEY: &str = "user_prompt";

/// Key of the manifest synthesized after the last step.
pub const MASTER_DOCUMENT_KEY: &str = "master_document";

/// Whether a key is owned by the runner and unavailable to steps.
pub fn is_reserved_key(key: &str) -> bool {
    key == USER_PROMPT_KEY || key == MASTER_DOCUMENT_KEY
}

/// Artifacts produced by a single pipeline execution, in production order.
///
/// A context is created fresh for every run and owned by it; it is never
/// shared between concurrent runs.
///
/// # Examples
///
/// ```
/// use folio_core::{Artifact, RunContext, USER_PROMPT_KEY};
///
/// let mut context = RunContext::new("a lighthouse keeper");
/// context.insert("concept", Artifact::Text("A keeper alone at sea".to_string()));
///
/// assert_eq!(context.user_prompt(), "a lighthouse keeper");
/// assert_eq!(context.keys().collect::<Vec<_>>(), vec![USER_PROMPT_KEY, "concept"]);
/// assert_eq!(context.step_keys().collect::<Vec<_>>(), vec!["concept"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    artifacts: IndexMap<String, Artifact>,
}

impl RunContext {
    /// Create a context seeded with the user prompt under [`USER_PROMPT_KEY`].
    pub fn new(user_prompt: impl Into<String>) -> Self {
        let mut artifacts = IndexMap::new();
        artifacts.insert(USER_PROMPT_KEY.to_string(), Artifact::Text(user_prompt.into()));
        Self { artifacts }
    }

    /// The prompt this run was seeded with.
    pub fn user_prompt(&self) -> &str {
        self.artifacts
            .get(USER_PROMPT_KEY)
            .and_then(Artifact::as_text)
            .unwrap_or_default()
    }

    /// Store an artifact, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, artifact: Artifact) -> Option<Artifact> {
        self.artifacts.insert(key.into(), artifact)
    }

    /// Look up an artifact.
    pub fn get(&self, key: &str) -> Option<&Artifact> {
        self.artifacts.get(key)
    }

    /// Whether an artifact is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.artifacts.contains_key(key)
    }

    /// All keys, reserved ones included, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Artifact)> {
        self.artifacts.iter().map(|(key, artifact)| (key.as_str(), artifact))
    }

    /// Keys produced by document steps, in insertion order.
    pub fn step_keys(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| !is_reserved_key(key))
    }

    /// Entries that belong in the packaged archive: every step output plus the
    /// master document, excluding the seeded prompt.
    pub fn packaged_entries(&self) -> impl Iterator<Item = (&str, &Artifact)> {
        self.iter().filter(|(key, _)| *key != USER_PROMPT_KEY)
    }

    /// Number of stored artifacts, reserved ones included.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the context holds nothing (never true for a seeded context).
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
