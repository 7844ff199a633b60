use std::fmt;
use std::fmt::Formatter;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use spdlog::{debug, info, warn};

use crate::auth::{AdminCredential, Authorizer};
use crate::content_query::{ContentQuery, PostRepository};
use crate::export::archive_builder::{ArchiveBuilder, FinishedArchive};
use crate::export::converter::HtmlConverter;
use crate::export::error::ExportError;
use crate::export::filter::Filter;
use crate::export::post_renderer::{render_index, PostRenderer};
use crate::form_data::FormData;

pub const INDEX_FILE: &str = "index.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Authorizing,
    Querying,
    Rendering,
    Archiving,
    Responding,
    Done,
    Failed,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What to do when a single post cannot be converted to Markdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionPolicy {
    /// Leave the post out of the archive and of the index
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    /// Where the per-export temporary directory is created. System temp dir if `None`.
    pub temp_dir: Option<PathBuf>,
    pub on_conversion_error: ConversionPolicy,
}

/// A submitted export form with the caller's credential
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub admin_credential: Option<AdminCredential>,
    pub form: FormData,
}

pub struct ExportedArchive {
    pub file_name: String,
    pub archive: FinishedArchive,
    pub exported: usize,
    pub skipped: usize,
}

/// Runs one export from the submitted form to a sealed archive.
///
/// An orchestrator serves a single request. Temporary storage belongs to the
/// archive being built, so every early return releases it.
pub struct ExportOrchestrator<'a> {
    repository: &'a dyn PostRepository,
    converter: &'a dyn HtmlConverter,
    authorizer: &'a dyn Authorizer,
    settings: ExportSettings,
    state: ExportState,
}

impl<'a> ExportOrchestrator<'a> {
    pub fn new(repository: &'a dyn PostRepository,
               converter: &'a dyn HtmlConverter,
               authorizer: &'a dyn Authorizer,
               settings: ExportSettings) -> Self {
        ExportOrchestrator {
            repository,
            converter,
            authorizer,
            settings,
            state: ExportState::Idle,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn run(&mut self, request: &ExportRequest) -> Result<ExportedArchive, ExportError> {
        self.run_at(request, Local::now().date_naive())
    }

    /// Same as [`ExportOrchestrator::run`], `today` names the archive when the form has no file name
    pub fn run_at(&mut self, request: &ExportRequest, today: NaiveDate) -> Result<ExportedArchive, ExportError> {
        match self.execute(request, today) {
            Ok(exported) => {
                self.transition(ExportState::Done);
                info!("Exported {} posts to {} ({} skipped, {} bytes)",
                    exported.exported, exported.file_name, exported.skipped, exported.archive.len());
                Ok(exported)
            }
            Err(e) => {
                warn!("Export failed while {}: {}", self.state, e);
                self.transition(ExportState::Failed);
                Err(e)
            }
        }
    }

    fn execute(&mut self, request: &ExportRequest, today: NaiveDate) -> Result<ExportedArchive, ExportError> {
        self.transition(ExportState::Authorizing);
        if !self.authorizer.is_authorized_admin(request) || !self.authorizer.valid_token(request) {
            return Err(ExportError::PermissionDenied);
        }

        self.transition(ExportState::Querying);
        let filter = Filter::from_form(&request.form)?;
        let posts = ContentQuery::new(self.repository).find(&filter)?;
        if posts.is_empty() {
            return Err(ExportError::NotFound);
        }

        self.transition(ExportState::Rendering);
        let mut builder = ArchiveBuilder::open(self.settings.temp_dir.as_deref())?;
        let renderer = PostRenderer::new(self.converter);
        let mut index = Vec::with_capacity(posts.len());
        let mut skipped = 0;

        for post in posts.iter() {
            match renderer.render(post) {
                Ok(doc) => {
                    builder.add(&doc.archive_path, doc.markdown.as_bytes())?;
                    index.push((post.title.clone(), doc.archive_path));
                }
                Err(e @ ExportError::Conversion { .. }) if self.settings.on_conversion_error == ConversionPolicy::Skip => {
                    warn!("{}, post left out of the archive", e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        self.transition(ExportState::Archiving);
        builder.add(INDEX_FILE, render_index(&index).as_bytes())?;
        let archive = builder.finalize()?;

        self.transition(ExportState::Responding);
        Ok(ExportedArchive {
            file_name: filter.file_name(today),
            archive,
            exported: index.len(),
            skipped,
        })
    }

    fn transition(&mut self, next: ExportState) {
        debug!("Export state {} -> {}", self.state, next);
        self.state = next;
    }
}
