//! List view controller: state machine and view model of a list screen.

pub mod controller;
pub mod model;

pub use controller::{ListController, PendingFetch};
pub use model::{
    EmptyStateKind, ListAction, ListState, ListViewModel, LoadPhase, compute_list_view_model,
    reduce_list_state,
};
