use std::path::PathBuf;

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{CommandOutput, with_record_type};
use crate::api::{AnySource, ListParams};
use crate::config::Config;
use crate::display::{format_footer, format_page_buttons, format_table};
use crate::error::Result;
use crate::query::{FilterState, Selection, SortOrder, SortState};
use crate::record::{Record, Resource};
use crate::screen::ScreenConfig;
use crate::view::{EmptyStateKind, ListAction, ListController};

/// Options for the `ls` command
#[derive(Debug, Clone)]
pub struct LsOptions {
    pub resource: Resource,
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    /// Requested page; clamped into range
    pub page: i64,
    pub page_size: Option<usize>,
    pub from_file: Option<PathBuf>,
    pub json: bool,
}

impl LsOptions {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            search: None,
            status: None,
            category: None,
            level: None,
            sort: None,
            order: None,
            page: 1,
            page_size: None,
            from_file: None,
            json: false,
        }
    }

    fn filter_state(&self) -> FilterState {
        let selection = |value: &Option<String>| {
            value.as_deref().map(Selection::parse).unwrap_or_default()
        };
        FilterState {
            search_term: self.search.clone().unwrap_or_default(),
            status: selection(&self.status),
            category: selection(&self.category),
            level: selection(&self.level),
        }
    }
}

/// Sort requested on the command line, validated against the screen.
fn resolve_sort(
    screen: &ScreenConfig,
    key: Option<&str>,
    order: Option<SortOrder>,
) -> Result<SortState> {
    let initial = screen.initial_sort();
    match key {
        Some(key) => {
            let key = screen.require_sort_key(key)?.key;
            Ok(SortState::new(key, order.unwrap_or(screen.default_order)))
        }
        None => Ok(SortState::new(initial.key, order.unwrap_or(initial.order))),
    }
}

/// List one page of a resource
pub async fn cmd_ls(options: LsOptions) -> Result<()> {
    let config = Config::load()?;
    let mut screen = config.screen(options.resource);
    if let Some(page_size) = options.page_size {
        screen = screen.with_page_size(page_size);
    }
    let sort = resolve_sort(&screen, options.sort.as_deref(), options.order)?;
    let source = AnySource::open(options.from_file.as_deref(), &config)?;

    with_record_type!(options.resource, list_page(source, screen, sort, &options))
}

async fn list_page<R>(
    source: AnySource,
    screen: ScreenConfig,
    sort: SortState,
    options: &LsOptions,
) -> Result<()>
where
    R: Record + DeserializeOwned + Serialize + Send,
{
    let filter = options.filter_state();
    let mut controller: ListController<AnySource, R> =
        ListController::new(source, screen).with_server_params(ListParams::from_filter(&filter));

    controller.dispatch(ListAction::SetSearch(filter.search_term.clone()));
    controller.dispatch(ListAction::SetStatus(filter.status.clone()));
    controller.dispatch(ListAction::SetCategory(filter.category.clone()));
    controller.dispatch(ListAction::SetLevel(filter.level.clone()));
    controller.dispatch(ListAction::SetSort(sort));
    controller.refresh().await?;
    controller.dispatch(ListAction::GoToPage(options.page));

    let vm = controller.view_model();
    let resource = options.resource;

    let json_output = json!({
        "resource": resource.to_string(),
        "page": vm.current_page,
        "total_pages": vm.total_pages,
        "page_size": controller.screen().page_size,
        "total": vm.total_all,
        "total_filtered": vm.total_filtered,
        "range": vm.range_label,
        "sort": {
            "key": vm.sort.key,
            "order": vm.sort.order.to_string(),
        },
        "filters": {
            "search": filter.search_term,
            "status": filter.status.to_string(),
            "category": filter.category.to_string(),
            "level": filter.level.to_string(),
        },
        "records": serde_json::to_value(&vm.rows)?,
    });

    let text_output = match vm.empty_state {
        Some(kind) => {
            let mut text = kind.message().to_string();
            if kind == EmptyStateKind::NoMatches {
                text.push_str(&format!(
                    "\n{}",
                    format!("{} {} in total", vm.total_all, resource)
                        .if_supports_color(Stream::Stdout, |s| s.dimmed())
                ));
            }
            text
        }
        None => {
            let mut text = format_table(resource, &vm.rows);
            text.push('\n');
            text.push_str(
                &format_footer(&vm)
                    .if_supports_color(Stream::Stdout, |s| s.dimmed())
                    .to_string(),
            );
            if vm.total_pages > 1 {
                text.push('\n');
                text.push_str(&format_page_buttons(&vm));
            }
            text
        }
    };

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(options.json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScholarError;

    #[test]
    fn test_resolve_sort_defaults() {
        let screen = ScreenConfig::for_resource(Resource::Applications);
        assert_eq!(
            resolve_sort(&screen, None, None).unwrap(),
            SortState::new("date", SortOrder::Desc)
        );
        assert_eq!(
            resolve_sort(&screen, None, Some(SortOrder::Asc)).unwrap(),
            SortState::new("date", SortOrder::Asc)
        );
    }

    #[test]
    fn test_resolve_sort_normalizes_key() {
        let screen = ScreenConfig::for_resource(Resource::Applications);
        assert_eq!(
            resolve_sort(&screen, Some("GWA"), None).unwrap(),
            SortState::new("gwa", SortOrder::Desc)
        );
    }

    #[test]
    fn test_resolve_sort_rejects_unknown_key() {
        let screen = ScreenConfig::for_resource(Resource::Schools);
        assert!(matches!(
            resolve_sort(&screen, Some("owner"), None),
            Err(ScholarError::InvalidSortKey { .. })
        ));
    }

    #[test]
    fn test_filter_state_from_options() {
        let mut options = LsOptions::new(Resource::Schools);
        options.status = Some("All".to_string());
        options.level = Some("college".to_string());
        let filter = options.filter_state();
        assert!(filter.status.is_all());
        assert_eq!(filter.level.value(), Some("college"));
        assert!(filter.category.is_all());
    }
}
