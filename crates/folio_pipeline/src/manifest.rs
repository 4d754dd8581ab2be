//! Master document synthesis.

use crate::{DocumentSpec, key_label};
use folio_core::{Artifact, GroupMember, RunContext};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];
const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Build the master document for a finished run.
///
/// Lists every step key of `spec` present in `context`, in step order. Text
/// and binary entries get one line; groups get a heading followed by one line
/// per member.
///
/// ```
/// use folio_core::{Artifact, RunContext};
/// use folio_pipeline::{DocumentSpec, Step, master_document};
///
/// let spec = DocumentSpec::new(
///     "comic_book",
///     "Comic Book",
///     vec![Step::text("comic_concept", "Concept: {user_prompt}")],
/// )
/// .unwrap();
/// let mut context = RunContext::new("heroes");
/// context.insert("comic_concept", Artifact::Text("...".to_string()));
///
/// assert_eq!(
///     master_document(&spec, &context),
///     "Comic Book Master Document\n\nComic concept: See attached document.\n"
/// );
/// ```
pub fn master_document(spec: &DocumentSpec, context: &RunContext) -> String {
    let mut doc = format!("{} Master Document\n\n", spec.name());

    for key in spec.step_keys() {
        let Some(artifact) = context.get(key) else {
            continue;
        };
        let label = capitalize(&key_label(key));
        match artifact {
            Artifact::Text(_) | Artifact::Binary(_) => {
                doc.push_str(&format!("{}: See attached document.\n", label));
            }
            Artifact::Group(group) => {
                doc.push_str(&format!("{}:\n", label));
                for (name, member) in group.iter() {
                    doc.push_str(&format!(" - {}: See attached {}.\n", name, member_noun(name, member)));
                }
            }
        }
    }

    doc
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

fn member_noun(name: &str, member: &GroupMember) -> &'static str {
    let ext = extension(name);
    match member {
        GroupMember::Binary(_) => match ext {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => "image",
            _ => "document",
        },
        GroupMember::Text(_) => match ext {
            Some(ext) if !PLAIN_TEXT_EXTENSIONS.contains(&ext.as_str()) => "script",
            _ => "document",
        },
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
