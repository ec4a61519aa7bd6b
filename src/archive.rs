//! Vendor archive download and member extraction.
//!
//! The dataset ships as a gzipped tar archive with two member files, the
//! ranges file and the cities file, addressed by fixed in-archive names.
//! The download is buffered in memory; nothing is written to disk, so an
//! aborted run leaves no artifacts behind.

use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::config::ARCHIVE_TIMEOUT_SECS;
use crate::error_handling::IngestError;

/// Downloads the vendor archive.
///
/// Uses a dedicated client with a long timeout; the full dataset is tens
/// of megabytes. Any HTTP failure maps to `ArchiveFetch` before a single
/// table is touched.
pub async fn fetch_archive(url: &str) -> Result<Vec<u8>, IngestError> {
    log::info!("Downloading geobase archive from {url}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(ARCHIVE_TIMEOUT_SECS))
        .build()
        .map_err(IngestError::ArchiveFetch)?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(IngestError::ArchiveFetch)?;

    let bytes = response.bytes().await.map_err(IngestError::ArchiveFetch)?;
    log::info!("Downloaded archive ({} bytes)", bytes.len());
    Ok(bytes.to_vec())
}

/// Extracts one member file from the gzipped tar archive by name.
pub fn extract_member(archive: &[u8], member: &str) -> Result<Vec<u8>, IngestError> {
    let mut tar_archive = Archive::new(GzDecoder::new(archive));

    let entries = tar_archive
        .entries()
        .map_err(|e| IngestError::ArchiveExtract(format!("failed to read archive: {e}")))?;

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| IngestError::ArchiveExtract(format!("failed to read entry: {e}")))?;
        let path = entry
            .path()
            .map_err(|e| IngestError::ArchiveExtract(format!("failed to read entry path: {e}")))?;

        if path.file_name().and_then(|n| n.to_str()) == Some(member) {
            let mut raw = Vec::new();
            entry.read_to_end(&mut raw).map_err(|e| {
                IngestError::ArchiveExtract(format!("failed to read {member}: {e}"))
            })?;
            log::debug!("Extracted {member} from archive ({} bytes)", raw.len());
            return Ok(raw);
        }
    }

    Err(IngestError::ArchiveExtract(format!(
        "{member} not found in archive"
    )))
}
