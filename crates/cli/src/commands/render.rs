//! Offline feed rendering.
//!
//! Produces the same document as `GET /yml` on the server. Output to a file
//! is written to a temporary file in the target directory and renamed into place, so a
//! failed run never leaves a truncated feed behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use woo_yml_server::catalog::CatalogProvider;
use woo_yml_server::feed::{self, FeedQuery, FilterSelection};

use super::{CommandError, client_from_env};

/// Map command-line flags onto the feed query the server would receive.
#[must_use]
pub fn query(
    all: bool,
    categories: Option<String>,
    exclude_categories: Option<String>,
) -> FeedQuery {
    FeedQuery {
        all: all.then(|| "1".to_string()),
        categories,
        exclude_categories,
    }
}

/// Render the feed and write it to `output`, or stdout when `None`.
///
/// # Errors
///
/// Returns `CommandError` if the store check, rendering, or writing fails.
pub async fn run(query: &FeedQuery, output: Option<&Path>) -> Result<(), CommandError> {
    let client = client_from_env()?;
    client.check_platform().await?;

    let selection = FilterSelection::from_query(query, &client).await?;
    let generated_at = chrono::Local::now().naive_local();
    let document = feed::render(&client, &selection, generated_at).await?;

    match output {
        Some(path) => {
            write_atomic(path, &document)?;
            tracing::info!(path = %path.display(), bytes = document.len(), "Feed written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&document)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Write `contents` to `path` through a temporary file in the same directory.
///
/// The temporary file is removed if anything fails before the rename.
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
