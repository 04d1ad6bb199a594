use std::fs;
use std::io::Read;
use std::path::Path;

use bzip2::read::BzDecoder;
use speechprep_domain::{ArchiveExtractor, DomainError};
use tar::Archive;

/// Unpacks a bzip2-compressed tar held in memory.
///
/// Members land relative to `extract_to`; nothing is cleaned up when a member
/// fails halfway.
#[derive(Default)]
pub struct Bzip2TarExtractor;

impl Bzip2TarExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveExtractor for Bzip2TarExtractor {
    fn extract(&self, archive: &[u8], extract_to: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(extract_to)
            .map_err(|err| DomainError::io("create extraction directory", err))?;

        let mut tar = Archive::new(BzDecoder::new(archive));
        let summary = unpack_entries(&mut tar, extract_to)?;

        tracing::info!(
            extract_to = %extract_to.display(),
            archive_bytes = archive.len(),
            members = summary.unpacked,
            skipped = summary.skipped,
            "archive extracted"
        );
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct UnpackSummary {
    pub unpacked: usize,
    pub skipped: usize,
}

/// Members whose path climbs out of `extract_to` are skipped, not written.
pub(crate) fn unpack_entries<R: Read>(
    tar: &mut Archive<R>,
    extract_to: &Path,
) -> Result<UnpackSummary, DomainError> {
    let entries = tar
        .entries()
        .map_err(|err| DomainError::decode("open bzip2 tar archive", err))?;

    let mut summary = UnpackSummary::default();
    for entry in entries {
        let mut entry = entry.map_err(|err| DomainError::decode("read archive member", err))?;
        let unpacked = entry
            .unpack_in(extract_to)
            .map_err(|err| DomainError::decode("unpack archive member", err))?;
        if unpacked {
            summary.unpacked += 1;
        } else {
            summary.skipped += 1;
            tracing::warn!(
                member = %String::from_utf8_lossy(&entry.path_bytes()),
                extract_to = %extract_to.display(),
                "skipped archive member outside extraction directory"
            );
        }
    }
    Ok(summary)
}
