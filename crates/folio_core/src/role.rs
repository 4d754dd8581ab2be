//! Role types for chat participants.

use serde::{Deserialize, Serialize};

/// Speaker of a chat message sent to a text-completion service.
///
/// # Examples
///
/// ```
/// use folio_core::Role;
///
/// assert_eq!(format!("{}", Role::System), "system");
/// assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the assistant's behavior
    #[display("system")]
    System,
    /// The request itself
    #[display("user")]
    User,
    /// Model replies
    #[display("assistant")]
    Assistant,
}
