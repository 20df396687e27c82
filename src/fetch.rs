//! Streaming download of pre-signed shard URLs.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::constants::fetch::{DOWNLOAD_BUFFER_BYTES, PART_EXTENSION, PROGRESS_INTERVAL};
use crate::errors::ExtractError;

/// Download a pre-signed URL into `target`, returning the byte count.
///
/// The payload streams through a `.part` sibling that is renamed into
/// place on completion, so `target` never holds a truncated download.
/// Token issuance is the caller's concern: the URL must already embed any
/// credentials it needs. One attempt per call, no retry.
pub fn download_to(url: &str, target: &Path) -> Result<u64, ExtractError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| ExtractError::DownloadFailed {
            reason: format!("failed creating target dir {}: {err}", parent.display()),
        })?;
    }

    let response = ureq::get(url)
        .call()
        .map_err(|err| ExtractError::DownloadFailed {
            reason: format!("request for {} failed: {err}", target.display()),
        })?;
    let expected_bytes = response
        .headers()
        .get("content-length")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    let temp_target = target.with_extension(PART_EXTENSION);
    let mut reader = response.into_body().into_reader();
    let mut file = File::create(&temp_target).map_err(|err| ExtractError::DownloadFailed {
        reason: format!("failed creating {}: {err}", temp_target.display()),
    })?;

    info!("[prodeval:fetch] downloading shard -> {}", target.display());
    let started = Instant::now();
    let mut total_bytes = 0u64;
    let mut buffer = vec![0u8; DOWNLOAD_BUFFER_BYTES];
    let mut last_report = Instant::now();
    loop {
        let read = reader
            .read(&mut buffer)
            .map_err(|err| ExtractError::DownloadFailed {
                reason: format!("failed reading response stream: {err}"),
            })?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .map_err(|err| ExtractError::DownloadFailed {
                reason: format!("failed writing {}: {err}", temp_target.display()),
            })?;
        total_bytes = total_bytes.saturating_add(read as u64);

        if last_report.elapsed() >= PROGRESS_INTERVAL {
            match expected_bytes {
                Some(expected) if expected > 0 => {
                    let pct = ((total_bytes as f64 / expected as f64) * 100.0).clamp(0.0, 100.0);
                    info!(
                        "[prodeval:fetch] progress {}: {:.1}/{:.1} MiB ({:.1}%)",
                        target.display(),
                        total_bytes as f64 / (1024.0 * 1024.0),
                        expected as f64 / (1024.0 * 1024.0),
                        pct
                    );
                }
                _ => {
                    info!(
                        "[prodeval:fetch] progress {}: {:.1} MiB",
                        target.display(),
                        total_bytes as f64 / (1024.0 * 1024.0)
                    );
                }
            }
            last_report = Instant::now();
        }
    }

    fs::rename(&temp_target, target).map_err(|err| ExtractError::DownloadFailed {
        reason: format!(
            "failed moving {} -> {}: {err}",
            temp_target.display(),
            target.display()
        ),
    })?;

    info!(
        "[prodeval:fetch] download complete {}: {:.1} MiB in {:.1}s",
        target.display(),
        total_bytes as f64 / (1024.0 * 1024.0),
        started.elapsed().as_secs_f64()
    );
    Ok(total_bytes)
}
