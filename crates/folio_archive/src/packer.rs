//! ZIP encoding of a run context.

use std::io::{Cursor, Write};

use folio_core::{Artifact, GroupMember, RunContext};
use folio_error::{ArchiveError, ArchiveErrorKind, ArchiveResult};
use sha2::{Digest, Sha256};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Entry names `pack` would produce for `context`, in archive order.
pub fn entry_names(context: &RunContext) -> Vec<String> {
    let mut names = Vec::new();
    for (key, artifact) in context.packaged_entries() {
        match artifact {
            Artifact::Text(_) => names.push(format!("{}.txt", key)),
            Artifact::Binary(_) => names.push(key.to_string()),
            Artifact::Group(group) => {
                names.extend(group.iter().map(|(member, content)| member_path(key, member, content)));
            }
        }
    }
    names
}

/// Encode every packaged artifact of `context` into a ZIP archive.
#[tracing::instrument(skip(context), fields(entries = context.len()))]
pub fn pack(context: &RunContext) -> ArchiveResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for (key, artifact) in context.packaged_entries() {
        match artifact {
            Artifact::Text(text) => {
                write_entry(&mut writer, &format!("{}.txt", key), text.as_bytes(), options)?
            }
            Artifact::Binary(bytes) => write_entry(&mut writer, key, bytes, options)?,
            Artifact::Group(group) => {
                for (member, content) in group.iter() {
                    let name = member_path(key, member, content);
                    let bytes = match content {
                        GroupMember::Text(text) => text.as_bytes(),
                        GroupMember::Binary(bytes) => bytes.as_slice(),
                    };
                    write_entry(&mut writer, &name, bytes, options)?;
                }
            }
        }
    }

    let cursor = writer.finish().map_err(zip_error)?;
    let archive = cursor.into_inner();
    tracing::debug!(bytes = archive.len(), "Packed archive");
    Ok(archive)
}

/// SHA-256 of an archive, lowercase hex.
pub fn archive_digest(archive: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(archive);
    format!("{:x}", hasher.finalize())
}

/// Text members get a `.txt` suffix, binary members keep their name.
fn member_path(key: &str, member: &str, content: &GroupMember) -> String {
    match content {
        GroupMember::Text(_) => format!("{}/{}.txt", key, member),
        GroupMember::Binary(_) => format!("{}/{}", key, member),
    }
}

fn write_entry(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> ArchiveResult<()> {
    writer.start_file(name, options).map_err(zip_error)?;
    writer
        .write_all(bytes)
        .map_err(|e| ArchiveError::new(ArchiveErrorKind::Zip(format!("{}: {}", name, e))))?;
    Ok(())
}

#[track_caller]
fn zip_error(error: zip::result::ZipError) -> ArchiveError {
    ArchiveError::new(ArchiveErrorKind::Zip(error.to_string()))
}
