use std::path::{Path, PathBuf};

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::CommandOutput;
use crate::api::{HttpRecordSource, RecordSource};
use crate::config::Config;
use crate::error::{Result, ScholarError};
use crate::record::{Document, Resource};

/// File name to save a document under when no output path is given.
fn default_file_name(id: &str, document: Option<&Document>) -> String {
    let name = document
        .and_then(|d| d.name.as_deref())
        .map(|name| {
            name.chars()
                .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
                .collect::<String>()
        })
        .filter(|name| !name.trim().is_empty() && name != "." && name != "..");
    name.unwrap_or_else(|| format!("document-{id}"))
}

/// Download a document's file
pub async fn cmd_download(id: &str, output: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let source = HttpRecordSource::from_config(&config)?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let document: Option<Document> = match source.fetch(Resource::Documents, id).await {
                Ok(document) => Some(document),
                Err(ScholarError::RecordNotFound(_)) => {
                    return Err(ScholarError::RecordNotFound(id.to_string()));
                }
                Err(e) => {
                    tracing::debug!("could not read document {id} details: {e}");
                    None
                }
            };
            PathBuf::from(default_file_name(id, document.as_ref()))
        }
    };

    let bytes = source.download(id).await?;
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        ScholarError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {e}", path.display()),
        ))
    })?;
    tracing::info!("saved document {id} ({} bytes)", bytes.len());

    let json_output = json!({
        "action": "download",
        "id": id,
        "path": path.to_string_lossy(),
        "bytes": bytes.len(),
    });
    let text = format!(
        "Saved {} bytes to {}",
        bytes.len(),
        path.display().if_supports_color(Stream::Stdout, |s| s.cyan())
    );

    CommandOutput::new(json_output).with_text(text).print(json)
}
