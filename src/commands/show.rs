use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CommandOutput, with_record_type};
use crate::api::{AnySource, RecordSource};
use crate::config::Config;
use crate::display::format_detail;
use crate::error::Result;
use crate::record::{Record, Resource};

/// Display a single record
pub async fn cmd_show(
    resource: Resource,
    id: &str,
    from_file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let source = AnySource::open(from_file, &config)?;
    with_record_type!(resource, show_record(&source, resource, id, json))
}

async fn show_record<R>(source: &AnySource, resource: Resource, id: &str, json: bool) -> Result<()>
where
    R: Record + DeserializeOwned + Serialize + Send,
{
    let record: R = source.fetch(resource, id).await?;
    let text = format_detail(resource, &record);

    CommandOutput::new(serde_json::to_value(&record)?)
        .with_text(text.trim_end())
        .print(json)
}
