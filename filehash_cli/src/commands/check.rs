//! Duplicate check for a single file

use super::App;
use anyhow::Result;
use filehash_core::check_duplicate;
use filehash_core::store::FileDescriptor;
use std::path::Path;

/// Hash the file and look its digests up in the store, without writing
/// anything. Returns true when a duplicate was found.
pub async fn run(app: &App, path: &Path, strict: bool) -> Result<bool> {
    let mime = mime_guess::from_path(path).first().map(|m| m.to_string());
    let mut descriptor = FileDescriptor::new(0, path);
    if let Some(mime) = mime {
        descriptor = descriptor.with_mime_type(mime);
    }

    let algorithms = app.settings.enabled_algorithms();
    let digests = app.service.compute(&descriptor, &algorithms).await;
    let violations = check_duplicate(
        &digests,
        &app.settings,
        app.store.as_ref(),
        app.store.as_ref(),
        strict,
    )
    .await?;

    match violations.first() {
        Some(violation) => {
            println!("{}", violation.message);
            Ok(true)
        }
        None => {
            println!("No duplicates found.");
            Ok(false)
        }
    }
}
