//! Built-in document types and lookup by identifier.

use crate::DocumentSpec;
use folio_error::{DocumentError, DocumentErrorKind};
use strum::IntoEnumIterator;
use tracing::debug;

/// Document types bundled with the binary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinDocument {
    /// Concept, plot, character/panel/cover images and a recap
    ComicBook,
    /// 2D game concept, world, characters, images and Unity scripts
    GamePlan,
    /// Campaign concept, plan, spreadsheets, sized images and tips
    MarketingCampaign,
}

impl BuiltinDocument {
    /// Bundled TOML definition.
    pub fn source(self) -> &'static str {
        match self {
            BuiltinDocument::ComicBook => include_str!("../documents/comic_book.toml"),
            BuiltinDocument::GamePlan => include_str!("../documents/game_plan.toml"),
            BuiltinDocument::MarketingCampaign => {
                include_str!("../documents/marketing_campaign.toml")
            }
        }
    }

    /// Parse and validate the bundled definition.
    pub fn load(self) -> Result<DocumentSpec, DocumentError> {
        self.source().parse()
    }
}

/// Document specs addressable by identifier, in registration order.
///
/// # Examples
///
/// ```
/// use folio_pipeline::DocumentRegistry;
///
/// let registry = DocumentRegistry::builtin().unwrap();
/// assert_eq!(registry.ids(), vec!["comic_book", "game_plan", "marketing_campaign"]);
/// assert_eq!(registry.get("comic_book").unwrap().name(), "Comic Book");
/// assert!(registry.get("novel").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: Vec<DocumentSpec>,
}

impl DocumentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every [`BuiltinDocument`].
    pub fn builtin() -> Result<Self, DocumentError> {
        let mut registry = Self::new();
        for document in BuiltinDocument::iter() {
            registry.register(document.load()?)?;
        }
        Ok(registry)
    }

    /// Add a document.
    ///
    /// # Errors
    ///
    /// [`DocumentErrorKind::DuplicateKey`] when the identifier is taken.
    pub fn register(&mut self, spec: DocumentSpec) -> Result<(), DocumentError> {
        if self.documents.iter().any(|existing| existing.id() == spec.id()) {
            return Err(DocumentError::new(DocumentErrorKind::DuplicateKey(
                spec.id().clone(),
            )));
        }
        debug!(document = %spec.id(), "Registered document");
        self.documents.push(spec);
        Ok(())
    }

    /// Find a document by identifier.
    pub fn get(&self, id: &str) -> Result<&DocumentSpec, DocumentError> {
        self.documents
            .iter()
            .find(|spec| spec.id() == id)
            .ok_or_else(|| DocumentError::new(DocumentErrorKind::UnknownDocument(id.to_string())))
    }

    /// Registered identifiers.
    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(|spec| spec.id().as_str()).collect()
    }

    /// Registered documents.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentSpec> {
        self.documents.iter()
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
