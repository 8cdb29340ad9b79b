#[macro_use]
mod macros;

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod query;
pub mod record;
pub mod screen;
pub mod view;

pub use api::{AnySource, FileRecordSource, HttpRecordSource, ListParams, RecordSource};
pub use config::Config;
pub use error::{Result, ScholarError};
pub use query::{
    FilterState, ListQuery, ListQueryBuilder, Page, PaginationState, Selection, SortOrder,
    SortState, apply_filters, apply_sort, page_window, paginate,
};
pub use record::{Application, Document, Program, Record, RecordId, Resource, School, Student};
pub use screen::ScreenConfig;
pub use view::{
    ListAction, ListController, ListState, LoadPhase, compute_list_view_model, reduce_list_state,
};
