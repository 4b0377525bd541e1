//! The application controller.
//!
//! [`StudySession`] owns every piece of mutable state (files, status,
//! correction, explanation flags, chat) and changes it only through its
//! event handlers. Handlers that await take `&mut self`, so a second solve
//! or chat turn cannot start while one is pending.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use edusolve_core::document::{explanation_indices, parse_solution};
use edusolve_core::file::{ingest, read_file};
use edusolve_core::{Block, ChatMessage, FileId, SessionStatus, Solution, UploadedFile, Visibility};
use edusolve_llms::ChatSession;
use edusolve_observability::{chat_span, record_duration, record_error, solve_span};
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};

use crate::clipboard::ClipboardSink;
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::export::{export_with_expanded, DocumentExporter, ExportOptions};
use crate::gateway::ModelGateway;
use crate::prompt::compose;

/// Reply shown when a chat turn fails.
pub const CHAT_FALLBACK: &str =
    "Désolé, je n'ai pas pu répondre à cette question. Réessayez dans un instant.";

pub struct StudySession {
    config: RuntimeConfig,
    gateway: ModelGateway,
    status: watch::Sender<SessionStatus>,
    courses: Vec<UploadedFile>,
    exercise: Option<UploadedFile>,
    solution: Option<Solution>,
    document: Vec<Block>,
    visibility: Visibility,
    chat: Option<ChatSession>,
    transcript: Vec<ChatMessage>,
}

impl StudySession {
    pub fn new(gateway: ModelGateway, config: RuntimeConfig) -> Self {
        let (status, _) = watch::channel(SessionStatus::Idle);
        Self {
            config,
            gateway,
            status,
            courses: Vec::new(),
            exercise: None,
            solution: None,
            document: Vec::new(),
            visibility: Visibility::new(),
            chat: None,
            transcript: Vec::new(),
        }
    }

    pub fn from_config(config: RuntimeConfig) -> Self {
        let gateway = ModelGateway::from_config(&config);
        Self::new(gateway, config)
    }

    /// Watch status changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    fn set_status(&self, status: SessionStatus) {
        debug!(status = status.label(), "status");
        self.status.send_replace(status);
    }

    /// Show `Uploading` while `work` runs, then put the previous status back.
    /// A solved session stays `Solved` throughout: a correction exists only
    /// in that state.
    async fn while_uploading<T>(&self, work: impl Future<Output = T>) -> T {
        if self.solution.is_some() {
            return work.await;
        }
        let previous = self.status();
        self.set_status(SessionStatus::Uploading);
        let output = work.await;
        self.set_status(previous);
        output
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    pub fn courses(&self) -> &[UploadedFile] {
        &self.courses
    }

    pub fn exercise(&self) -> Option<&UploadedFile> {
        self.exercise.as_ref()
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn document(&self) -> &[Block] {
        &self.document
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn chat_available(&self) -> bool {
        self.chat.is_some()
    }

    /// Ingest a course selection and append it. The selection is emptied.
    pub async fn add_courses(&mut self, selection: &mut Vec<PathBuf>) -> Result<usize> {
        let files = self.while_uploading(ingest(selection)).await?;
        let count = files.len();
        self.add_course_files(files);
        Ok(count)
    }

    pub fn add_course_files(&mut self, files: impl IntoIterator<Item = UploadedFile>) {
        for file in files {
            info!(name = %file.name, media_type = %file.media_type, size = file.size, "course added");
            self.courses.push(file);
        }
    }

    /// Ingest one exercise file, replacing any previous one.
    pub async fn set_exercise(&mut self, path: &Path) -> Result<()> {
        let file = self.while_uploading(read_file(path)).await?;
        self.set_exercise_file(file);
        Ok(())
    }

    pub fn set_exercise_file(&mut self, file: UploadedFile) {
        info!(name = %file.name, media_type = %file.media_type, "exercise set");
        self.exercise = Some(file);
    }

    /// Remove a course by id. Returns false when no course had that id.
    pub fn remove_course(&mut self, id: &FileId) -> bool {
        let before = self.courses.len();
        self.courses.retain(|f| &f.id != id);
        before != self.courses.len()
    }

    pub fn clear_exercise(&mut self) -> Option<UploadedFile> {
        self.exercise.take()
    }

    /// Run one solve cycle.
    ///
    /// Missing inputs are rejected before anything changes. Otherwise the
    /// previous correction and chat are discarded, the model is called, and
    /// the status ends as `Solved` or `Error`.
    pub async fn solve(&mut self) -> Result<&Solution> {
        let exercise = match &self.exercise {
            Some(exercise) if !self.courses.is_empty() => exercise,
            _ => return Err(RuntimeError::MissingInputs),
        };

        let span = solve_span!(self.courses.len(), exercise.name.as_str());
        let composed = compose(&self.courses, exercise);
        if !composed.unread_courses.is_empty() {
            warn!(files = ?composed.unread_courses, "course files not attached");
        }
        if !composed.exercise_attached {
            warn!(name = %exercise.name, "exercise not attached: unsupported media type");
        }

        self.set_status(SessionStatus::Processing);
        self.solution = None;
        self.document.clear();
        self.visibility.collapse_all();
        self.chat = None;
        self.transcript.clear();

        let result = self.gateway.generate(composed).instrument(span).await;

        match result {
            Ok(text) => {
                let solution = Solution::new(text);
                self.document = parse_solution(&solution.text);
                self.chat = Some(self.gateway.open_chat(&solution));
                info!(
                    blocks = self.document.len(),
                    explanations = explanation_indices(&self.document).len(),
                    "correction ready"
                );
                self.set_status(SessionStatus::Solved);
                Ok(self.solution.insert(solution))
            }
            Err(e) => {
                self.set_status(SessionStatus::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Send one follow-up question. A failed turn is answered with
    /// [`CHAT_FALLBACK`] instead of an error.
    pub async fn send_chat(&mut self, text: impl Into<String>) -> Result<&ChatMessage> {
        let chat = self.chat.as_ref().ok_or(RuntimeError::ChatUnavailable)?;
        let text = text.into();
        let turn = self.transcript.len() / 2 + 1;
        self.transcript.push(ChatMessage::user(text.clone()));

        let span = chat_span!(chat.id(), turn);
        let reply = async {
            let start = Instant::now();
            let result = chat.send(text).await;
            record_duration("duration_ms", start.elapsed());
            match result {
                Ok(reply) if reply.trim().is_empty() => CHAT_FALLBACK.to_string(),
                Ok(reply) => reply,
                Err(e) => {
                    record_error(&e);
                    CHAT_FALLBACK.to_string()
                }
            }
        }
        .instrument(span)
        .await;

        self.transcript.push(ChatMessage::model(reply));
        // just pushed
        Ok(&self.transcript[self.transcript.len() - 1])
    }

    /// Flip one explanation. Returns the new state.
    pub fn toggle_explanation(&mut self, index: usize) -> bool {
        self.visibility.toggle(index)
    }

    pub fn set_all_explanations(&mut self, expanded: bool) {
        if expanded {
            self.visibility.expand_all(explanation_indices(&self.document));
        } else {
            self.visibility.collapse_all();
        }
    }

    /// Export the correction with every explanation open; flags are restored
    /// afterwards.
    pub async fn export<E>(&mut self, exporter: &E, options: &ExportOptions) -> Result<PathBuf>
    where
        E: DocumentExporter + ?Sized,
    {
        if self.solution.is_none() {
            return Err(RuntimeError::NoSolution);
        }
        export_with_expanded(
            exporter,
            &self.document,
            &mut self.visibility,
            self.config.export_settle,
            options,
        )
        .await
    }

    pub fn copy_solution(&self, sink: &dyn ClipboardSink) -> Result<()> {
        let solution = self.solution.as_ref().ok_or(RuntimeError::NoSolution)?;
        sink.set_text(&solution.text)
    }

    /// Start a new cycle: drop the correction, flags and chat, keep the
    /// selected files.
    pub fn reset(&mut self) {
        self.solution = None;
        self.document.clear();
        self.visibility.collapse_all();
        self.chat = None;
        self.transcript.clear();
        self.set_status(SessionStatus::Idle);
    }
}
