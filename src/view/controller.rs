use serde::de::DeserializeOwned;

use super::model::{
    ListAction, ListState, ListViewModel, compute_list_view_model, reduce_list_state,
};
use crate::api::{ListParams, RecordSource};
use crate::error::Result;
use crate::record::Record;
use crate::screen::ScreenConfig;

/// A fetch that has been started but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub generation: u64,
    pub params: ListParams,
}

/// Drives one list screen: owns its state and the source it loads from.
///
/// Local actions go through [`dispatch`](Self::dispatch) and never touch the
/// source. Only [`refresh`](Self::refresh) and [`retry`](Self::retry) fetch.
pub struct ListController<S, R> {
    source: S,
    screen: ScreenConfig,
    state: ListState<R>,
    server_params: ListParams,
}

impl<S, R> ListController<S, R>
where
    S: RecordSource,
    R: Record + DeserializeOwned + Send,
{
    pub fn new(source: S, screen: ScreenConfig) -> Self {
        let state = ListState::new(&screen);
        Self {
            source,
            screen,
            state,
            server_params: ListParams::default(),
        }
    }

    /// Forward these parameters with every list request. The local pipeline
    /// still filters the response.
    pub fn with_server_params(mut self, params: ListParams) -> Self {
        self.server_params = params;
        self
    }

    pub fn state(&self) -> &ListState<R> {
        &self.state
    }

    pub fn screen(&self) -> &ScreenConfig {
        &self.screen
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn dispatch(&mut self, action: ListAction<R>) {
        let state = std::mem::replace(&mut self.state, ListState::new(&self.screen));
        self.state = reduce_list_state(state, action, &self.screen);
    }

    pub fn view_model(&self) -> ListViewModel<'_, R> {
        compute_list_view_model(&self.state, &self.screen)
    }

    /// Move to `Loading` and hand out the generation the result must carry.
    pub fn begin_fetch(&mut self) -> PendingFetch {
        self.dispatch(ListAction::BeginFetch);
        PendingFetch {
            generation: self.state.generation(),
            params: self.server_params.clone(),
        }
    }

    /// Feed a fetch result back in. Results of superseded fetches are dropped.
    pub fn complete_fetch(&mut self, generation: u64, result: &Result<Vec<R>>)
    where
        R: Clone,
    {
        let action = match result {
            Ok(records) => ListAction::FetchSucceeded {
                generation,
                records: records.clone(),
            },
            Err(e) => ListAction::FetchFailed {
                generation,
                message: e.to_string(),
            },
        };
        self.dispatch(action);
    }

    /// Fetch the screen's records. Returns how many were loaded.
    pub async fn refresh(&mut self) -> Result<usize> {
        self.dispatch(ListAction::BeginFetch);
        self.fetch_current().await
    }

    /// Fetch again after a failure. Outside the error state this does nothing.
    pub async fn retry(&mut self) -> Result<usize> {
        if self.state.phase.error_message().is_none() {
            return Ok(self.state.records.len());
        }
        self.dispatch(ListAction::Retry);
        self.fetch_current().await
    }

    async fn fetch_current(&mut self) -> Result<usize> {
        let generation = self.state.generation();
        tracing::debug!("fetching {} (generation {generation})", self.screen.resource);

        match self
            .source
            .list::<R>(self.screen.resource, &self.server_params)
            .await
        {
            Ok(records) => {
                let count = records.len();
                self.dispatch(ListAction::FetchSucceeded {
                    generation,
                    records,
                });
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("failed to load {}: {e}", self.screen.resource);
                self.dispatch(ListAction::FetchFailed {
                    generation,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
