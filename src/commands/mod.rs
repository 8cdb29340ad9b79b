//! Command implementations behind the CLI.

mod config;
mod download;
mod ls;
mod mutate;
mod show;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use download::cmd_download;
pub use ls::{LsOptions, cmd_ls};
pub use mutate::{cmd_create, cmd_delete, cmd_update, read_payload};
pub use show::cmd_show;

use serde_json::Value;

use crate::error::Result;

/// Run a generic async function with the typed record of a resource.
macro_rules! with_record_type {
    ($resource:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $resource {
            $crate::record::Resource::Schools => $func::<$crate::record::School>($($arg),*).await,
            $crate::record::Resource::Programs => $func::<$crate::record::Program>($($arg),*).await,
            $crate::record::Resource::Applications => {
                $func::<$crate::record::Application>($($arg),*).await
            }
            $crate::record::Resource::Documents => {
                $func::<$crate::record::Document>($($arg),*).await
            }
            $crate::record::Resource::Students => $func::<$crate::record::Student>($($arg),*).await,
        }
    };
}
pub(crate) use with_record_type;

/// Output of a command in both JSON and human-readable form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form (falling back to JSON).
    pub fn print(self, json: bool) -> Result<()> {
        match (json, self.text) {
            (false, Some(text)) => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}
