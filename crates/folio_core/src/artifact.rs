//! Produced content.
//!
//! An [`Artifact`] is what a single pipeline step leaves behind in the run
//! context. Batch steps produce an [`ArtifactGroup`] whose members are flat
//! text or binary entries; groups never nest.

use indexmap::IndexMap;
use std::borrow::Cow;

/// Output of one step.
///
/// # Examples
///
/// ```
/// use folio_core::{Artifact, ArtifactGroup, GroupMember};
///
/// let mut cover = ArtifactGroup::new();
/// cover.insert("image_1.png", GroupMember::Binary(vec![0x89, 0x50]));
/// cover.insert("image_2.png", GroupMember::Binary(Vec::new()));
///
/// let artifact = Artifact::Group(cover);
/// assert_eq!(artifact.prompt_text(), "image_1.png, image_2.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum Artifact {
    /// Generated or rendered text
    Text(String),
    /// Raw bytes; the key carries the file extension
    Binary(Vec<u8>),
    /// Named members produced by a batch step
    Group(ArtifactGroup),
}

impl Artifact {
    /// Text content, if this is a text artifact.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Artifact::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Bytes, if this is a binary artifact.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Artifact::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Group, if this artifact came from a batch step.
    pub fn as_group(&self) -> Option<&ArtifactGroup> {
        match self {
            Artifact::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The string substituted for a `{key}` placeholder referencing this artifact.
    ///
    /// Text is inserted verbatim, binary content is summarized by size and a
    /// group becomes the comma-separated list of its member names in order.
    pub fn prompt_text(&self) -> Cow<'_, str> {
        match self {
            Artifact::Text(text) => Cow::Borrowed(text),
            Artifact::Binary(bytes) => Cow::Owned(format!("[binary artifact, {} bytes]", bytes.len())),
            Artifact::Group(group) => Cow::Owned(group.names().collect::<Vec<_>>().join(", ")),
        }
    }
}

/// A flat member of an [`ArtifactGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMember {
    /// Text member (e.g. a generated script)
    Text(String),
    /// Binary member (e.g. an image); empty when its generation failed
    Binary(Vec<u8>),
}

impl GroupMember {
    /// Whether the member carries no content.
    pub fn is_empty(&self) -> bool {
        match self {
            GroupMember::Text(text) => text.is_empty(),
            GroupMember::Binary(bytes) => bytes.is_empty(),
        }
    }
}

/// Insertion-ordered mapping of member name to content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactGroup {
    members: IndexMap<String, GroupMember>,
}

impl ArtifactGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member, replacing any previous member of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, member: GroupMember) -> Option<GroupMember> {
        self.members.insert(name.into(), member)
    }

    /// Look up a member by name.
    pub fn get(&self, name: &str) -> Option<&GroupMember> {
        self.members.get(name)
    }

    /// Member names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupMember)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, GroupMember)> for ArtifactGroup {
    fn from_iter<I: IntoIterator<Item = (N, GroupMember)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(|(name, member)| (name.into(), member)).collect(),
        }
    }
}
