//! Bulk digest generation

use super::App;
use anyhow::{Context, Result};
use filehash_core::store::{FileDescriptor, FileStatus};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Hash every file under the given paths into the digest store.
///
/// Files are registered on first sight and hashed missing-only unless
/// `force` recomputes everything. Each file's pass is independent; a file
/// that cannot be read simply ends up with empty digest columns.
pub async fn run(app: &App, paths: &[PathBuf], force: bool, no_progress: bool) -> Result<()> {
    let files = collect_files(paths)?;
    if files.is_empty() {
        println!("No files to process.");
        return Ok(());
    }

    let bar = if no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("##-"),
        );
        bar
    };

    let algorithms = app.settings.enabled_algorithms();
    let mut processed = 0usize;
    for path in &files {
        bar.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let uri = path.to_string_lossy();
        let mime = mime_guess::from_path(path).first().map(|m| m.to_string());
        let existing = app.db.find_by_uri(&uri).await?;
        let fid = match existing {
            Some(fid) => fid,
            None => {
                app.db
                    .register_file(&uri, mime.as_deref(), FileStatus::Permanent)
                    .await?
            }
        };

        let mut descriptor = FileDescriptor::new(fid, path.clone()).with_status(FileStatus::Permanent);
        if let Some(mime) = mime {
            descriptor = descriptor.with_mime_type(mime);
        }

        let capture_original = existing.is_none() && app.settings.original;
        if force {
            app.service
                .hash_file(&descriptor, &algorithms, capture_original)
                .await?;
        } else {
            app.service.presave(&descriptor, existing.is_none()).await?;
        }
        debug!("processed {uri}");
        processed += 1;
        bar.inc(1);
    }

    bar.finish_and_clear();
    println!(
        "Processed {processed} file(s) with {} algorithm(s).",
        algorithms.len()
    );
    Ok(())
}

fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("walking {}", path.display()))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("no such file or directory: {}", path.display());
        }
    }
    Ok(files)
}
