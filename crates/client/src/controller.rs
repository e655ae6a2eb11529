//! Search submission pipeline.
//!
//! A submission goes: validate the term, consult the cache, otherwise dispatch
//! to the mode's endpoint, validate the reply, cache it, and hand the rendered
//! view to the [`Surface`]. The loading indicator is tied to a drop guard so it
//! is hidden on every exit path of the latest submission.
//!
//! Each submission takes a sequence token. A reply that arrives after a newer
//! submission started is cached but never shown.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use coursefind_core::{Course, Error, ProfessorMatch, ResultCache, SearchMode};

use crate::api::{SearchClient, SearchPayload};
use crate::render::{self, EMPTY_TERM_MESSAGE, SEARCH_FAILED_MESSAGE, View};

/// Where search output is drawn.
pub trait Surface: Send + Sync {
    /// Remove any previously shown results.
    fn clear(&self);

    fn show_loading(&self);

    fn hide_loading(&self);

    fn show(&self, view: &View);

    /// Update the search box hint after a mode change.
    fn set_placeholder(&self, _placeholder: &str) {}
}

/// Shows the loading indicator for one submission.
///
/// On drop the indicator is hidden only if no newer submission has started;
/// a superseded request leaves it to the submission that replaced it.
struct LoadingGuard<'a> {
    controller: &'a SearchController,
    token: u64,
}

impl<'a> LoadingGuard<'a> {
    fn show(controller: &'a SearchController, token: u64) -> Self {
        controller.loading.store(true, Ordering::SeqCst);
        controller.surface.show_loading();
        Self { controller, token }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.controller.is_latest(self.token) {
            self.controller.hide_loading();
        }
    }
}

/// Where the controller is in the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Rendered,
    Errored,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Empty term; nothing was looked up.
    Rejected(View),
    /// Served from the cache without a network call.
    Cached(View),
    /// Fetched from the backend.
    Fetched(View),
    /// Server or transport error.
    Failed(View),
    /// A newer submission started before this reply arrived.
    Superseded,
}

impl Outcome {
    pub fn view(&self) -> Option<&View> {
        match self {
            Outcome::Rejected(v) | Outcome::Cached(v) | Outcome::Fetched(v) | Outcome::Failed(v) => Some(v),
            Outcome::Superseded => None,
        }
    }
}

/// Drives searches for one search box.
pub struct SearchController {
    client: SearchClient,
    cache: ResultCache,
    surface: Arc<dyn Surface>,
    mode: RwLock<SearchMode>,
    phase: RwLock<Phase>,
    sequence: AtomicU64,
    loading: AtomicBool,
}

impl SearchController {
    pub fn new(client: SearchClient, cache: ResultCache, surface: Arc<dyn Surface>) -> Self {
        Self {
            client,
            cache,
            surface,
            mode: RwLock::new(SearchMode::default()),
            phase: RwLock::new(Phase::Idle),
            sequence: AtomicU64::new(0),
            loading: AtomicBool::new(false),
        }
    }

    /// Make `mode` the active mode and return its placeholder text.
    pub fn select_mode(&self, mode: SearchMode) -> &'static str {
        *self.mode.write().unwrap_or_else(|e| e.into_inner()) = mode;
        let placeholder = mode.placeholder();
        self.surface.set_placeholder(placeholder);
        placeholder
    }

    /// The mode last chosen with [`select_mode`](Self::select_mode).
    pub fn mode(&self) -> SearchMode {
        *self.mode.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn phase(&self) -> Phase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.write().unwrap_or_else(|e| e.into_inner()) = phase;
    }

    fn is_latest(&self, token: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == token
    }

    /// Hide the indicator if some submission left it showing.
    fn hide_loading(&self) {
        if self.loading.swap(false, Ordering::SeqCst) {
            self.surface.hide_loading();
        }
    }

    /// Run a search with a mode given by name; unknown names search by title.
    pub async fn submit_named(&self, term: &str, mode: &str) -> Outcome {
        self.submit(term, SearchMode::from_name(mode)).await
    }

    /// Re-run a professor search for a suggested name.
    pub async fn choose_suggestion(&self, suggestion: &str) -> Outcome {
        self.submit(suggestion, SearchMode::Professor).await
    }

    /// Run one search and show its result.
    pub async fn submit(&self, term: &str, mode: SearchMode) -> Outcome {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.surface.clear();

        if term.trim().is_empty() {
            self.hide_loading();
            let view = View::Error(EMPTY_TERM_MESSAGE.to_string());
            self.surface.show(&view);
            self.set_phase(Phase::Errored);
            return Outcome::Rejected(view);
        }

        if let Some(view) = self.cached_view(mode, term).await {
            self.hide_loading();
            self.surface.show(&view);
            self.set_phase(Phase::Rendered);
            return Outcome::Cached(view);
        }

        self.set_phase(Phase::Searching);
        let _loading = LoadingGuard::show(self, token);

        let outcome = match self.client.search(mode, term).await {
            Ok(payload) => {
                self.store(mode, term, &payload).await;
                Outcome::Fetched(render::render(&payload))
            }
            Err(Error::Server(message)) => {
                tracing::debug!(%mode, "server rejected search: {}", message);
                Outcome::Failed(View::Error(message))
            }
            Err(e) => {
                tracing::error!(%mode, "search request failed: {}", e);
                Outcome::Failed(View::Error(SEARCH_FAILED_MESSAGE.to_string()))
            }
        };

        if !self.is_latest(token) {
            tracing::debug!(%mode, token, "dropping stale search response");
            return Outcome::Superseded;
        }

        if let Some(view) = outcome.view() {
            self.surface.show(view);
        }
        self.set_phase(match outcome {
            Outcome::Failed(_) => Phase::Errored,
            _ => Phase::Rendered,
        });
        outcome
    }

    async fn cached_view(&self, mode: SearchMode, term: &str) -> Option<View> {
        if mode.returns_courses() {
            let courses: Vec<Course> = self.cache.get(mode, term).await?;
            Some(render::render_courses(&courses))
        } else {
            let matches: Vec<ProfessorMatch> = self.cache.get(mode, term).await?;
            Some(render::render_professors(&matches))
        }
    }

    async fn store(&self, mode: SearchMode, term: &str, payload: &SearchPayload) {
        match payload {
            SearchPayload::Courses(courses) => self.cache.set(mode, term, courses).await,
            SearchPayload::Matches(matches) => self.cache.set(mode, term, matches).await,
            SearchPayload::Suggestions(_) => tracing::debug!(%mode, "not caching suggestions"),
        }
    }
}
