use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

mod error;
mod github;
mod history;
mod types;

pub use error::FetchError;
pub use github::GithubProfileClient;
pub use history::{SearchHistory, HISTORY_LIMIT};
pub use types::{Follower, Profile};

/// Remote source of profile data.
///
/// [`GithubProfileClient`] implements this against the real API; tests
/// substitute recording stubs.
#[async_trait]
pub trait RemoteProfileClient: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError>;
    async fn fetch_followers(&self, username: &str) -> Result<Vec<Follower>, FetchError>;
}

/// Notifications broadcast by [`ProfileSearchController`] whenever its
/// state changes. Consumers re-read [`ProfileSearchController::snapshot`]
/// on receipt; events carry only enough detail to log or display.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    SearchStarted { username: String },
    SearchApplied { username: String },
    SearchFailed { username: String, error: FetchError },
    /// A search finished after a newer one had already started; its result
    /// was discarded without touching displayed state or history.
    SearchSuperseded { username: String },
    QuerySelected { username: String },
    HistoryChanged,
    HistoryVisibilityChanged { visible: bool },
}

/// Point-in-time copy of everything a frontend renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub profile: Option<Profile>,
    pub followers: Vec<Follower>,
    pub loading: bool,
    pub last_error: Option<FetchError>,
    pub history: Vec<String>,
    pub history_visible: bool,
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self {
            query: String::new(),
            profile: None,
            followers: Vec::new(),
            loading: false,
            last_error: None,
            history: Vec::new(),
            history_visible: true,
        }
    }
}

struct SearchState {
    query: String,
    profile: Option<Profile>,
    followers: Vec<Follower>,
    loading: bool,
    last_error: Option<FetchError>,
    history: SearchHistory,
    history_visible: bool,
    /// Bumped by every `search` call; a finishing search only commits its
    /// result while its generation is still the latest.
    generation: u64,
}

/// Session-local search state machine for the profile finder.
///
/// Owns the displayed profile, the follower list, the bounded search
/// history and the request lifecycle flags. All mutation goes through the
/// async operations below; frontends watch [`subscribe_events`] and pull
/// fresh snapshots.
///
/// [`subscribe_events`]: ProfileSearchController::subscribe_events
pub struct ProfileSearchController {
    remote: Arc<dyn RemoteProfileClient>,
    inner: Mutex<SearchState>,
    events: broadcast::Sender<SearchEvent>,
}

impl ProfileSearchController {
    pub fn new(remote: Arc<dyn RemoteProfileClient>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            remote,
            inner: Mutex::new(SearchState {
                query: String::new(),
                profile: None,
                followers: Vec::new(),
                loading: false,
                last_error: None,
                history: SearchHistory::new(),
                history_visible: true,
                generation: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let inner = self.inner.lock().await;
        SearchSnapshot {
            query: inner.query.clone(),
            profile: inner.profile.clone(),
            followers: inner.followers.clone(),
            loading: inner.loading,
            last_error: inner.last_error.clone(),
            history: inner.history.entries().to_vec(),
            history_visible: inner.history_visible,
        }
    }

    /// Resolves `username` against the remote API and applies the result.
    ///
    /// The profile is fetched first; only once it resolves is the followers
    /// request issued, for the same username. Both results commit in one
    /// step: on any failure the previously displayed profile, followers and
    /// history stay exactly as they were, with only `last_error` set.
    ///
    /// Calling `search` again while a search is in flight supersedes the
    /// older one. A superseded search discards its result, records no
    /// history entry and leaves the loading flag to its successor.
    pub async fn search(&self, username: &str) -> Result<(), FetchError> {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.loading = true;
            inner.last_error = None;
            inner.generation
        };
        info!(username, "search: started");
        let _ = self.events.send(SearchEvent::SearchStarted {
            username: username.to_string(),
        });

        let profile = match self.remote.fetch_profile(username).await {
            Ok(profile) => profile,
            Err(err) => return self.finish_failed(generation, username, err).await,
        };

        // A newer search may have started while the profile request was in
        // flight; if so, skip the followers request entirely.
        if !self.is_current(generation).await {
            info!(username, "search: superseded before followers fetch");
            let _ = self.events.send(SearchEvent::SearchSuperseded {
                username: username.to_string(),
            });
            return Ok(());
        }

        let followers = match self.remote.fetch_followers(username).await {
            Ok(followers) => followers,
            Err(err) => return self.finish_failed(generation, username, err).await,
        };

        self.finish_applied(generation, username, profile, followers)
            .await
    }

    /// Copies a history entry back into the query field without searching.
    pub async fn select_from_history(&self, username: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.query = username.to_string();
        }
        let _ = self.events.send(SearchEvent::QuerySelected {
            username: username.to_string(),
        });
    }

    /// Deletes every history entry matching `username`. Unknown names are
    /// a no-op and emit nothing.
    pub async fn remove_from_history(&self, username: &str) {
        let changed = {
            let mut inner = self.inner.lock().await;
            let before = inner.history.entries().len();
            inner.history.remove(username);
            inner.history.entries().len() != before
        };
        if changed {
            let _ = self.events.send(SearchEvent::HistoryChanged);
        }
    }

    /// Empties the history. Safe to call repeatedly; only the emptying
    /// call emits an event.
    pub async fn clear_history(&self) {
        let changed = {
            let mut inner = self.inner.lock().await;
            let had_entries = !inner.history.is_empty();
            inner.history.clear();
            had_entries
        };
        if changed {
            let _ = self.events.send(SearchEvent::HistoryChanged);
        }
    }

    /// Flips whether the history panel should be shown and returns the new
    /// setting. Purely presentational; history contents are unaffected.
    pub async fn toggle_history_visibility(&self) -> bool {
        let visible = {
            let mut inner = self.inner.lock().await;
            inner.history_visible = !inner.history_visible;
            inner.history_visible
        };
        let _ = self.events.send(SearchEvent::HistoryVisibilityChanged { visible });
        visible
    }

    async fn is_current(&self, generation: u64) -> bool {
        self.inner.lock().await.generation == generation
    }

    async fn finish_applied(
        &self,
        generation: u64,
        username: &str,
        profile: Profile,
        followers: Vec<Follower>,
    ) -> Result<(), FetchError> {
        let committed = {
            let mut inner = self.inner.lock().await;
            if inner.generation == generation {
                inner.profile = Some(profile);
                inner.followers = followers;
                inner.history.record(username);
                inner.query.clear();
                inner.loading = false;
                inner.last_error = None;
                true
            } else {
                false
            }
        };

        if !committed {
            info!(username, "search: stale result discarded");
            let _ = self.events.send(SearchEvent::SearchSuperseded {
                username: username.to_string(),
            });
            return Ok(());
        }

        info!(username, "search: applied");
        let _ = self.events.send(SearchEvent::SearchApplied {
            username: username.to_string(),
        });
        let _ = self.events.send(SearchEvent::HistoryChanged);
        Ok(())
    }

    async fn finish_failed(
        &self,
        generation: u64,
        username: &str,
        error: FetchError,
    ) -> Result<(), FetchError> {
        let committed = {
            let mut inner = self.inner.lock().await;
            if inner.generation == generation {
                inner.loading = false;
                inner.last_error = Some(error.clone());
                true
            } else {
                false
            }
        };

        if !committed {
            info!(username, "search: stale failure discarded");
            let _ = self.events.send(SearchEvent::SearchSuperseded {
                username: username.to_string(),
            });
            return Ok(());
        }

        warn!(username, error = %error, "search: failed");
        let _ = self.events.send(SearchEvent::SearchFailed {
            username: username.to_string(),
            error: error.clone(),
        });
        Err(error)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
