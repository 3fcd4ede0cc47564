//! Session controller
//!
//! Owns all session state and sequences the annotation workflow:
//!
//! ```text
//! Login -> LoadingQueue -> Segmenting <-> Tagging -> Submitting -> (next item) ... -> Exhausted
//! ```
//!
//! Every mutation goes through a command method. Backend calls are the only
//! suspension points; they are issued strictly in program order, and
//! responses are matched against a [`RequestTicket`] so that a response for a
//! word the worker already left is discarded.

use crate::backend::Backend;
use crate::error::{Result, SessionError, WorkspaceError};
use crate::models::{SenseUnit, WordDetail, WorkerSession};
use crate::notifier::Notifier;
use crate::queue::{NextItem, PhaseLabel, QueueAction, QueueCounts, QueueManager, WorkItem};
use crate::tagging::{allowed_tags, TagCheck, TagChoiceError, TagSheet};
use crate::view::{
    ContextRow, Gesture, Notice, Screen, SegmentingView, StatusLine, TaggingView, View, ViewState,
};
use crate::workspace::WordWorkspace;
use morphseg_common::{TagKind, UiStrings};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Session controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Login,
    /// Fetching the queue or the current word
    LoadingQueue,
    Segmenting,
    Tagging,
    /// Final annotation in flight
    Submitting,
    Exhausted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Login => "LOGIN",
            SessionState::LoadingQueue => "LOADING_QUEUE",
            SessionState::Segmenting => "SEGMENTING",
            SessionState::Tagging => "TAGGING",
            SessionState::Submitting => "SUBMITTING",
            SessionState::Exhausted => "EXHAUSTED",
        }
    }
}

/// Identity of the word a backend request was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub word_type: String,
}

/// Whether a backend response was applied or discarded as stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Session behaviour settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Client display width in pixels, sent on login
    pub display_width: u32,
    /// Start every morph tagged as a stem
    pub preselect_stem: bool,
    pub strings: UiStrings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            display_width: 1280,
            preselect_stem: true,
            strings: UiStrings::default(),
        }
    }
}

pub struct SessionController<V: View> {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    view: V,
    config: SessionConfig,
    state: SessionState,
    email: Option<String>,
    worker: Option<WorkerSession>,
    queue: QueueManager,
    queue_loaded: bool,
    current: Option<WorkItem>,
    workspace: Option<WordWorkspace>,
    tags: Option<TagSheet>,
    /// Bumped every time the current item changes
    generation: u64,
    announced_phase: Option<PhaseLabel>,
}

impl<V: View> SessionController<V> {
    /// Create a controller in the `Login` state
    ///
    /// Must be called inside a tokio runtime (starts the notification task).
    pub fn new(backend: Arc<dyn Backend>, view: V, config: SessionConfig) -> Self {
        let notifier = Notifier::spawn(backend.clone());
        let mut controller = Self {
            backend,
            notifier,
            view,
            config,
            state: SessionState::Login,
            email: None,
            worker: None,
            queue: QueueManager::default(),
            queue_loaded: false,
            current: None,
            workspace: None,
            tags: None,
            generation: 0,
            announced_phase: None,
        };
        controller.render();
        controller
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn worker(&self) -> Option<&WorkerSession> {
        self.worker.as_ref()
    }

    /// Login succeeded, even if loading the queue or a word did not
    pub fn is_logged_in(&self) -> bool {
        self.worker.is_some()
    }

    pub fn counts(&self) -> QueueCounts {
        self.queue.counts()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn workspace(&self) -> Option<&WordWorkspace> {
        self.workspace.as_ref()
    }

    pub fn tag_sheet(&self) -> Option<&TagSheet> {
        self.tags.as_ref()
    }

    /// Word form currently shown (or being fetched)
    pub fn current_word(&self) -> Option<&str> {
        self.current.as_ref().map(WorkItem::word_type)
    }

    /// Ticket for a request targeting the current item
    pub fn current_ticket(&self) -> Option<RequestTicket> {
        self.current.as_ref().map(|item| RequestTicket {
            generation: self.generation,
            word_type: item.word_type().to_string(),
        })
    }

    /// Wait for outstanding best-effort notifications
    pub async fn flush(&self) {
        self.notifier.flush().await;
    }

    fn require(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state != expected {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidState {
            state: self.state.as_str(),
            action,
        }
    }

    fn uid(&self) -> Result<String> {
        self.worker
            .as_ref()
            .map(|w| w.id.clone())
            .ok_or(SessionError::NotLoggedIn)
    }

    /// Report a failed backend step; the state is left as it was
    fn report(&mut self, context: &str, error: &SessionError) {
        warn!(error = %error, "{}", context);
        let message = format!("{}: {}", context, error);
        self.view.notify(&Notice::Error(message));
        self.render();
    }

    // ---- Login and queue -------------------------------------------------

    /// Log in and load the word queue
    pub async fn login(&mut self, email: &str) -> Result<()> {
        self.require(SessionState::Login, "log in")?;
        self.email = Some(email.to_string());

        let worker = match self.backend.login(email, self.config.display_width).await {
            Ok(worker) => worker,
            Err(e) => {
                let e = SessionError::from(e);
                self.report("Login failed", &e);
                return Err(e);
            }
        };
        info!(
            uid = %worker.id,
            completed = worker.completed_count,
            iteration = worker.iteration,
            "Worker logged in"
        );
        self.worker = Some(worker);
        self.state = SessionState::LoadingQueue;
        self.render();

        self.load_queue().await
    }

    /// Fetch the word queue and present the first item
    pub async fn load_queue(&mut self) -> Result<()> {
        self.require(SessionState::LoadingQueue, "load the queue")?;
        let uid = self.uid()?;

        let buckets = match self.backend.fetch_queue(&uid).await {
            Ok(buckets) => buckets,
            Err(e) => {
                let e = SessionError::from(e);
                let context = self.config.strings.fetch_failed.clone();
                self.report(&context, &e);
                return Err(e);
            }
        };
        info!(
            buckets = buckets.len(),
            words = buckets.iter().map(|b| b.forms.len()).sum::<usize>(),
            "Queue loaded"
        );
        self.queue = QueueManager::new(buckets);
        self.queue_loaded = true;

        self.advance().await
    }

    /// Repeat the step that failed last (login, queue fetch or word fetch)
    pub async fn retry(&mut self) -> Result<()> {
        match self.state {
            SessionState::Login => {
                let email = self.email.clone().ok_or_else(|| self.invalid("retry"))?;
                self.login(&email).await
            }
            SessionState::LoadingQueue if !self.queue_loaded => self.load_queue().await,
            SessionState::LoadingQueue if self.current.is_some() => self.load_current().await,
            SessionState::LoadingQueue => self.advance().await,
            _ => Err(self.invalid("retry")),
        }
    }

    // ---- Item sequencing -------------------------------------------------

    /// Drop the finished item and move to the next one
    async fn advance(&mut self) -> Result<()> {
        self.generation += 1;
        self.current = None;
        self.workspace = None;
        self.tags = None;

        match self.queue.next_item() {
            NextItem::Exhausted => {
                info!("Session exhausted");
                self.state = SessionState::Exhausted;
                self.announce_phase();
                let done = self.config.strings.done.clone();
                self.view.notify(&Notice::Completed(done));
                self.render();
                Ok(())
            }
            NextItem::Item(item) => {
                self.current = Some(item);
                self.state = SessionState::LoadingQueue;
                self.announce_phase();
                self.load_current().await
            }
        }
    }

    /// Build the workspace for the current item, fetching it if needed
    async fn load_current(&mut self) -> Result<()> {
        let item = self.current.clone().ok_or_else(|| self.invalid("load a word"))?;
        let ticket = self.current_ticket().ok_or_else(|| self.invalid("load a word"))?;

        let result = match item {
            WorkItem::Sense(unit) => WordWorkspace::from_sense_unit(unit)
                .map(|ws| self.install_workspace(ws))
                .map_err(SessionError::from),
            WorkItem::Word { form, .. } => {
                let uid = self.uid()?;
                match self.backend.fetch_word(&form, &uid).await {
                    Ok(detail) => self.apply_word_detail(&ticket, detail).map(|_| ()),
                    Err(e) => Err(SessionError::from(e)),
                }
            }
        };

        if let Err(e) = &result {
            if let SessionError::Workspace(WorkspaceError::InvalidShape { .. }) = e {
                error!(error = %e, "Backend sent a malformed word");
            }
            let context = self.config.strings.fetch_failed.clone();
            self.report(&context, e);
        }
        result
    }

    /// Apply a fetched word, unless the worker has moved on since the request
    pub fn apply_word_detail(&mut self, ticket: &RequestTicket, detail: WordDetail) -> Result<Applied> {
        if !self.is_current(ticket) || self.state != SessionState::LoadingQueue {
            warn!(word = %ticket.word_type, "Discarding stale word response");
            return Ok(Applied::Stale);
        }
        let workspace = WordWorkspace::from_detail(detail)?;
        self.install_workspace(workspace);
        Ok(Applied::Current)
    }

    fn install_workspace(&mut self, workspace: WordWorkspace) {
        debug!(
            word = %workspace.word_type(),
            contexts = workspace.active_count(),
            "Word ready"
        );
        self.workspace = Some(workspace);
        self.tags = None;
        self.state = SessionState::Segmenting;
        self.render();
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation && self.current_word() == Some(ticket.word_type.as_str())
    }

    /// Surface a one-time notice if the visible phase changed
    fn announce_phase(&mut self) {
        let phase = self.queue.phase_label();
        if self.announced_phase.as_ref() == Some(&phase) {
            return;
        }

        let strings = &self.config.strings;
        let (label, explanation) = match &phase {
            PhaseLabel::Bucket {
                label,
                has_prediction,
            } => {
                let explanation = if *has_prediction { &strings.pred } else { &strings.no_pred };
                (label.clone(), explanation.clone())
            }
            PhaseLabel::Deferred => (strings.skipped.clone(), strings.skipped_expl.clone()),
            PhaseLabel::Exhausted => (strings.iter_done.clone(), strings.thanks.clone()),
        };
        let text = strings.phase_notice(&label, &explanation);

        info!(phase = %label, "Phase changed");
        self.announced_phase = Some(phase);
        self.view.notify(&Notice::PhaseChanged {
            label,
            explanation,
            text,
        });
    }

    // ---- Segmenting ------------------------------------------------------

    pub fn toggle_boundary(&mut self, index: usize) -> Result<()> {
        self.require(SessionState::Segmenting, "toggle a boundary")?;
        let uid = self.uid()?;
        let workspace = self.workspace.as_mut().ok_or(no_word("toggle a boundary"))?;
        workspace.toggle_boundary(index)?;
        self.notifier.boundary_click(&uid, index);
        self.render();
        Ok(())
    }

    /// Clear all boundaries; each cleared slot is audited like a click
    pub fn reset_boundaries(&mut self) -> Result<()> {
        self.require(SessionState::Segmenting, "reset boundaries")?;
        let uid = self.uid()?;
        let workspace = self.workspace.as_mut().ok_or(no_word("reset boundaries"))?;
        let cleared = workspace.reset_all();
        for &index in &cleared {
            self.notifier.boundary_click(&uid, index);
        }
        self.notifier.reset(&uid, workspace.word_type());
        debug!(word = %workspace.word_type(), cleared = cleared.len(), "Boundaries reset");
        self.render();
        Ok(())
    }

    /// Detach a context as a distinct sense; unknown or inactive ids are ignored
    ///
    /// Refused for a word with a single context.
    pub fn split_sense(&mut self, context_id: &str) -> Result<()> {
        self.require(SessionState::Segmenting, "split a sense")?;
        let uid = self.uid()?;
        let workspace = self.workspace.as_mut().ok_or(no_word("split a sense"))?;
        if !workspace.split_allowed() {
            return Err(SessionError::InvalidState {
                state: "single context",
                action: "split a sense",
            });
        }

        if let Some(pending) = workspace.split_off_context(context_id) {
            let blocked = !workspace.can_submit();
            self.notifier.sense_split(&uid, context_id);
            self.queue.push_pending(pending);
            if blocked {
                let message = self.config.strings.no_contexts.clone();
                self.view.notify(&Notice::Error(message));
            }
        }
        self.render();
        Ok(())
    }

    /// Noise and skip are also allowed on a word that failed to load
    fn require_word_in_hand(&self, action: &'static str) -> Result<()> {
        match self.state {
            SessionState::Segmenting => Ok(()),
            SessionState::LoadingQueue if self.current.is_some() && self.workspace.is_none() => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    /// Report the word as not a valid word and move on without tagging
    pub async fn mark_noise(&mut self) -> Result<()> {
        self.require_word_in_hand("mark as noise")?;
        let uid = self.uid()?;
        let form = self.current_word().unwrap_or_default().to_string();
        info!(word = %form, "Marked as noise");
        self.notifier.noise(&uid, &form);
        self.advance().await
    }

    /// Postpone the current word
    pub async fn defer(&mut self) -> Result<()> {
        self.require_word_in_hand("skip")?;
        let uid = self.uid()?;
        let form = match &self.current {
            Some(WorkItem::Word { form, .. }) => form.clone(),
            _ => return Err(self.invalid("skip split-off senses")),
        };
        if self.queue.defer(form.as_str()) == QueueAction::Disabled {
            return Err(SessionError::InvalidState {
                state: "revisiting skipped words",
                action: "skip",
            });
        }
        info!(word = %form, "Word skipped");
        self.notifier.skip(&uid, &form);
        self.advance().await
    }

    /// Revisit skipped words now; the current word is put back first
    pub async fn activate_deferred(&mut self) -> Result<()> {
        self.require_word_in_hand("revisit skipped words")?;
        if !self.queue.unskip_available() {
            return Err(self.invalid("revisit skipped words"));
        }

        if let Some(item) = self.current.take() {
            let item = match (item, &self.workspace) {
                // Keep only the senses that were not split off again
                (WorkItem::Sense(unit), Some(workspace)) => {
                    let contexts: Vec<_> = workspace.active_contexts().cloned().collect();
                    (!contexts.is_empty()).then(|| {
                        WorkItem::Sense(SenseUnit {
                            contexts,
                            ..unit
                        })
                    })
                }
                (item, _) => Some(item),
            };
            if let Some(item) = item {
                self.queue.restore_front(item);
            }
        }
        self.queue.activate_deferred();
        self.advance().await
    }

    /// Send the segmentation; a multi-morph result opens tagging
    pub async fn submit_segmentation(&mut self) -> Result<()> {
        self.require(SessionState::Segmenting, "submit a segmentation")?;
        let uid = self.uid()?;
        let workspace = self.workspace.as_ref().ok_or(no_word("submit a segmentation"))?;
        if !workspace.can_submit() {
            return Err(SessionError::SubmissionBlocked(self.config.strings.no_contexts.clone()));
        }
        let snapshot = workspace.snapshot();
        let ticket = self.current_ticket().ok_or_else(|| self.invalid("submit a segmentation"))?;

        let morphs = match self
            .backend
            .submit_segmentation(&snapshot.word_type, &uid, &snapshot.boundaries, &snapshot.contexts)
            .await
        {
            Ok(morphs) => morphs,
            Err(e) => {
                let e = SessionError::from(e);
                self.report("Segmentation failed", &e);
                return Err(e);
            }
        };
        self.apply_segmentation(&ticket, morphs).await.map(|_| ())
    }

    /// Apply the backend's morph split, unless the worker has moved on
    ///
    /// A single morph is tagged as a stem and submitted right away.
    pub async fn apply_segmentation(&mut self, ticket: &RequestTicket, morphs: Vec<String>) -> Result<Applied> {
        if !self.is_current(ticket) || self.state != SessionState::Segmenting {
            warn!(word = %ticket.word_type, "Discarding stale segmentation");
            return Ok(Applied::Stale);
        }

        match morphs.len() {
            0 => {
                let e = SessionError::Backend(crate::backend::BackendError::Parse(format!(
                    "empty segmentation for '{}'",
                    ticket.word_type
                )));
                self.report("Segmentation failed", &e);
                Err(e)
            }
            1 => {
                let morph = morphs.into_iter().next().unwrap_or_default();
                debug!(word = %ticket.word_type, "Single morph, tagging as stem");
                self.tags = Some(TagSheet::single_stem(morph));
                self.finalize(vec![TagKind::Stem], SessionState::Segmenting)
                    .await
                    .map(|_| Applied::Current)
            }
            _ => {
                debug!(word = %ticket.word_type, morphs = ?morphs, "Tagging");
                self.tags = Some(TagSheet::new(morphs, self.config.preselect_stem));
                self.state = SessionState::Tagging;
                self.render();
                Ok(Applied::Current)
            }
        }
    }

    // ---- Tagging ---------------------------------------------------------

    pub fn select_tag(&mut self, morph: usize, tag: TagKind) -> Result<()> {
        self.require(SessionState::Tagging, "select a tag")?;
        let sheet = self.tags.as_mut().ok_or_else(|| SessionError::InvalidState {
            state: "TAGGING",
            action: "select a tag",
        })?;
        sheet.select(morph, tag).map_err(|e| match e {
            TagChoiceError::OutOfRange { index, .. } | TagChoiceError::NotSelectable { index, .. } => {
                SessionError::TagNotSelectable { morph: index, tag }
            }
        })?;
        self.render();
        Ok(())
    }

    /// Return to segmenting; boundary edits are kept
    pub fn back(&mut self) -> Result<()> {
        self.require(SessionState::Tagging, "go back")?;
        self.tags = None;
        self.state = SessionState::Segmenting;
        self.render();
        Ok(())
    }

    /// Submit the final annotation once the tags are valid
    pub async fn submit_final(&mut self) -> Result<()> {
        self.require(SessionState::Tagging, "submit tags")?;
        let check = self
            .tags
            .as_ref()
            .map(TagSheet::check)
            .unwrap_or(TagCheck::Incomplete);
        let tags = match check {
            TagCheck::Valid(tags) => tags,
            TagCheck::Incomplete => {
                return Err(SessionError::SubmissionBlocked(self.config.strings.tag_all.clone()))
            }
            TagCheck::Illegal { .. } => {
                return Err(SessionError::SubmissionBlocked(self.config.strings.illegal.clone()))
            }
        };
        self.finalize(tags, SessionState::Tagging).await
    }

    /// Post the final annotation and advance; on failure return to `on_failure`
    async fn finalize(&mut self, tags: Vec<TagKind>, on_failure: SessionState) -> Result<()> {
        let uid = self.uid()?;
        let snapshot = self
            .workspace
            .as_ref()
            .map(WordWorkspace::snapshot)
            .ok_or_else(|| self.invalid("submit tags"))?;
        self.state = SessionState::Submitting;

        if let Err(e) = self
            .backend
            .submit_final(&snapshot.word_type, &uid, &snapshot.boundaries, &tags, &snapshot.contexts)
            .await
        {
            self.state = on_failure;
            if on_failure == SessionState::Segmenting {
                self.tags = None;
            }
            let e = SessionError::from(e);
            self.report("Submission failed", &e);
            return Err(e);
        }

        if let Some(worker) = self.worker.as_mut() {
            worker.record_submission();
            info!(
                word = %snapshot.word_type,
                tags = ?tags,
                completed = worker.completed_count,
                "Annotation submitted"
            );
        }
        self.advance().await
    }

    // ---- Dispatch --------------------------------------------------------

    /// Apply one worker gesture
    ///
    /// Rejected commands are reported to the view; failed backend steps have
    /// already been reported by the command itself.
    pub async fn handle(&mut self, gesture: Gesture) -> Result<()> {
        debug!(gesture = ?gesture, state = self.state.as_str(), "Gesture");
        let result = match gesture {
            Gesture::ToggleBoundary(index) => self.toggle_boundary(index),
            Gesture::Reset => self.reset_boundaries(),
            Gesture::SplitSense(id) => self.split_sense(&id),
            Gesture::MarkNoise => self.mark_noise().await,
            Gesture::Defer => self.defer().await,
            Gesture::ActivateDeferred => self.activate_deferred().await,
            Gesture::SubmitSegmentation => self.submit_segmentation().await,
            Gesture::SelectTag(morph, tag) => self.select_tag(morph, tag),
            Gesture::Back => self.back(),
            Gesture::SubmitFinal => self.submit_final().await,
            Gesture::Retry => self.retry().await,
        };

        if let Err(e) = &result {
            if is_rejection(e) {
                self.view.notify(&Notice::Error(e.to_string()));
            }
        }
        result
    }

    /// Process gestures in order until the session is exhausted or the channel closes
    pub async fn run(&mut self, mut gestures: mpsc::Receiver<Gesture>) {
        while self.state != SessionState::Exhausted {
            let Some(gesture) = gestures.recv().await else {
                break;
            };
            if let Err(e) = self.handle(gesture).await {
                debug!(error = %e, "Gesture not applied");
            }
        }
        self.notifier.flush().await;
    }

    // ---- Derived view state ----------------------------------------------

    fn render(&mut self) {
        let state = self.view_state();
        self.view.render(&state);
    }

    /// View model derived from the current session state
    pub fn view_state(&self) -> ViewState {
        let strings = &self.config.strings;
        let status = self.worker.as_ref().map(|worker| {
            let phase = match self.queue.phase_label() {
                PhaseLabel::Bucket { label, .. } => label,
                PhaseLabel::Deferred => strings.skipped.clone(),
                PhaseLabel::Exhausted => strings.iter_done.clone(),
            };
            let counts = self.queue.counts();
            StatusLine {
                header: strings.status_header(worker.iteration, &phase),
                counts: strings.status_counts(worker.completed_count, counts.deferred, &counts.remaining),
            }
        });

        let screen = match (self.state, &self.workspace, &self.tags) {
            (SessionState::Login, _, _) => Screen::Login,
            (SessionState::Exhausted, _, _) => Screen::Exhausted {
                message: strings.done.clone(),
            },
            (SessionState::Segmenting, Some(workspace), _) => Screen::Segmenting(self.segmenting_view(workspace)),
            (SessionState::Tagging, _, Some(sheet)) => Screen::Tagging(self.tagging_view(sheet)),
            _ => Screen::Loading,
        };

        ViewState { screen, status }
    }

    fn segmenting_view(&self, workspace: &WordWorkspace) -> SegmentingView {
        let is_word = matches!(self.current, Some(WorkItem::Word { .. }));
        let deferred = self.queue.counts().deferred;
        SegmentingView {
            word: workspace.word_type().to_string(),
            boundaries: workspace.boundaries().to_vec(),
            morphs: workspace.morphs(),
            contexts: workspace
                .context_rows()
                .map(|(c, active)| ContextRow {
                    context_id: c.context_id.clone(),
                    left_text: c.left_text.clone(),
                    right_text: c.right_text.clone(),
                    active,
                })
                .collect(),
            split_allowed: workspace.split_allowed(),
            can_submit: workspace.can_submit(),
            skip_enabled: is_word && !self.queue.is_deferred_mode(),
            unskip_visible: deferred > 0 || self.queue.is_deferred_mode(),
            unskip_enabled: self.queue.unskip_available(),
        }
    }

    fn tagging_view(&self, sheet: &TagSheet) -> TaggingView {
        let count = sheet.len();
        let check = sheet.check();
        let (status_message, illegal) = match &check {
            TagCheck::Valid(_) => (None, None),
            TagCheck::Incomplete => (Some(self.config.strings.tag_all.clone()), None),
            TagCheck::Illegal { position } => (Some(self.config.strings.illegal.clone()), Some(*position)),
        };
        TaggingView {
            morphs: sheet.morphs().to_vec(),
            tags: sheet.tags().to_vec(),
            choices: (0..count).map(|i| allowed_tags(i, count).to_vec()).collect(),
            status_message,
            illegal,
            submit_enabled: check.is_valid(),
        }
    }
}

fn no_word(action: &'static str) -> SessionError {
    SessionError::InvalidState {
        state: "no word loaded",
        action,
    }
}

/// Commands refused by the controller, as opposed to failed backend calls
fn is_rejection(error: &SessionError) -> bool {
    matches!(
        error,
        SessionError::InvalidState { .. }
            | SessionError::SubmissionBlocked(_)
            | SessionError::TagNotSelectable { .. }
            | SessionError::NotLoggedIn
            | SessionError::Workspace(WorkspaceError::Index { .. })
    )
}
