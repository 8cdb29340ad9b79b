mod common;

use std::fs;
use std::path::PathBuf;

use common::records_fixture;
use scholardesk::query::{Selection, SortOrder, SortState};
use scholardesk::record::{Application, Document, Resource, School};
use scholardesk::view::{EmptyStateKind, ListAction, ListController, LoadPhase};
use scholardesk::{FileRecordSource, ScholarError, ScreenConfig};
use serde_json::json;
use tempfile::TempDir;

fn write_records(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("records.json");
    fs::write(&path, serde_json::to_vec(&records_fixture()).unwrap()).unwrap();
    path
}

fn controller<R>(path: PathBuf, resource: Resource) -> ListController<FileRecordSource, R>
where
    R: scholardesk::Record + serde::de::DeserializeOwned + Send,
{
    ListController::new(
        FileRecordSource::new(path),
        ScreenConfig::for_resource(resource),
    )
}

#[tokio::test]
async fn test_schools_screen_search_flow() {
    let dir = TempDir::new().unwrap();
    let mut ctrl: ListController<_, School> = controller(write_records(&dir), Resource::Schools);

    assert_eq!(ctrl.refresh().await.unwrap(), 12);
    let vm = ctrl.view_model();
    assert_eq!(vm.total_pages, 2);
    assert_eq!(vm.range_label, "Showing 1 to 10 of 12");

    ctrl.dispatch(ListAction::NextPage);
    assert_eq!(ctrl.view_model().current_page, 2);

    ctrl.dispatch(ListAction::SetSearch("Caloocan".to_string()));
    let vm = ctrl.view_model();
    assert_eq!(vm.current_page, 1);
    assert_eq!(vm.total_filtered, 3);
    assert_eq!(vm.total_all, 12);
    assert_eq!(vm.total_pages, 1);
    assert!(!vm.has_next);
    assert_eq!(vm.empty_state, None);

    ctrl.dispatch(ListAction::SetSearch("Atlantis".to_string()));
    let vm = ctrl.view_model();
    assert_eq!(vm.empty_state, Some(EmptyStateKind::NoMatches));
    assert_eq!(vm.range_label, "Showing 0 to 0 of 0");

    ctrl.dispatch(ListAction::ClearFilters);
    assert_eq!(ctrl.view_model().total_filtered, 12);
}

#[tokio::test]
async fn test_sort_toggle_keeps_page() {
    let dir = TempDir::new().unwrap();
    let mut ctrl: ListController<_, School> = controller(write_records(&dir), Resource::Schools);
    ctrl.refresh().await.unwrap();
    ctrl.dispatch(ListAction::LastPage);

    let first_name = |ctrl: &ListController<FileRecordSource, School>| {
        ctrl.view_model().rows[0].name.clone().unwrap()
    };

    assert_eq!(ctrl.state().sort, SortState::new("name", SortOrder::Desc));
    ctrl.dispatch(ListAction::SortBy("name".to_string()));
    assert_eq!(ctrl.state().sort, SortState::new("name", SortOrder::Asc));
    assert_eq!(ctrl.view_model().current_page, 2);
    // Page 2 now holds the last two names in ascending order
    assert_eq!(first_name(&ctrl), "Unassigned Campus");

    ctrl.dispatch(ListAction::SortBy("students".to_string()));
    assert_eq!(ctrl.state().sort, SortState::new("students", SortOrder::Desc));
    assert_eq!(ctrl.view_model().current_page, 2);

    ctrl.dispatch(ListAction::FirstPage);
    assert_eq!(first_name(&ctrl), "Quezon City Polytechnic");
}

#[tokio::test]
async fn test_facets_combine_with_search() {
    let dir = TempDir::new().unwrap();
    let mut ctrl: ListController<_, Application> =
        controller(write_records(&dir), Resource::Applications);
    ctrl.refresh().await.unwrap();

    ctrl.dispatch(ListAction::SetStatus(Selection::parse("approved")));
    assert_eq!(ctrl.view_model().total_filtered, 6);

    ctrl.dispatch(ListAction::SetCategory(Selection::parse("need-based")));
    // Multiples of 12 up to 25
    assert_eq!(ctrl.view_model().total_filtered, 2);

    ctrl.dispatch(ListAction::SetSearch("Applicant 24".to_string()));
    let vm = ctrl.view_model();
    assert_eq!(vm.total_filtered, 1);
    assert_eq!(vm.rows[0].student_id.as_deref(), Some("2024-0024"));

    ctrl.dispatch(ListAction::SetStatus(Selection::All));
    ctrl.dispatch(ListAction::SetCategory(Selection::All));
    assert_eq!(ctrl.view_model().total_filtered, 1);
}

#[tokio::test]
async fn test_documents_ignore_level_selection() {
    let dir = TempDir::new().unwrap();
    let mut ctrl: ListController<_, Document> =
        controller(write_records(&dir), Resource::Documents);
    ctrl.refresh().await.unwrap();

    ctrl.dispatch(ListAction::SetLevel(Selection::parse("college")));
    assert_eq!(ctrl.view_model().total_filtered, 2);

    // Newest upload first by default
    assert_eq!(
        ctrl.view_model().rows[0].name.as_deref(),
        Some("id-card.png")
    );
}

#[tokio::test]
async fn test_failed_load_then_retry_after_file_appears() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");
    let mut ctrl: ListController<_, School> = controller(path.clone(), Resource::Schools);

    let err = ctrl.refresh().await.unwrap_err();
    assert!(matches!(err, ScholarError::Fetch(_)));
    let vm = ctrl.view_model();
    assert!(vm.error.is_some());
    assert!(!vm.is_loading);
    assert_eq!(vm.empty_state, Some(EmptyStateKind::LoadFailed));

    fs::write(&path, serde_json::to_vec(&records_fixture()).unwrap()).unwrap();
    assert_eq!(ctrl.retry().await.unwrap(), 12);
    assert_eq!(ctrl.state().phase, LoadPhase::Ready);
    assert!(ctrl.view_model().error.is_none());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_records() {
    let dir = TempDir::new().unwrap();
    let path = write_records(&dir);
    let mut ctrl: ListController<_, School> = controller(path.clone(), Resource::Schools);
    ctrl.refresh().await.unwrap();

    fs::write(&path, b"not json").unwrap();
    assert!(ctrl.refresh().await.is_err());

    let vm = ctrl.view_model();
    assert!(vm.error.is_some());
    assert_eq!(vm.total_all, 12);
    assert_eq!(vm.rows.len(), 10);
    assert_eq!(vm.empty_state, None);
}

#[tokio::test]
async fn test_only_latest_fetch_result_is_applied() {
    let dir = TempDir::new().unwrap();
    let mut ctrl: ListController<_, School> = controller(write_records(&dir), Resource::Schools);

    let older = ctrl.begin_fetch();
    let newer = ctrl.begin_fetch();
    assert!(newer.generation > older.generation);

    let fresh: Vec<School> = serde_json::from_value(json!([{"id": 1, "name": "Fresh"}])).unwrap();
    let stale: Vec<School> = serde_json::from_value(json!([
        {"id": 1, "name": "Stale"},
        {"id": 2, "name": "Stale too"}
    ]))
    .unwrap();

    ctrl.complete_fetch(newer.generation, &Ok(fresh));
    ctrl.complete_fetch(older.generation, &Ok(stale));
    ctrl.complete_fetch(
        older.generation,
        &Err(ScholarError::Fetch("timed out".to_string())),
    );

    assert_eq!(ctrl.state().phase, LoadPhase::Ready);
    assert_eq!(ctrl.state().records.len(), 1);
    assert_eq!(ctrl.state().records[0].name.as_deref(), Some("Fresh"));
}
