//! Social image jobs and their execution.
//!
//! Head rendering never blocks on images: it hands back a [`SocialImageJob`]
//! and whoever drives the build decides when and where it runs.
//!
//! - [`SocialImageGenerator::generate`] runs one job on the calling thread.
//! - [`SocialImageJob::spawn`] runs one job on the rayon pool and returns a
//!   completion channel.
//! - [`generate_all`] runs a batch in parallel, bounded by the rayon pool
//!   (sized from `processing.max_processes`), and streams progress events.
//!
//! Every job overwrites its output file unconditionally.

use super::backend::{BackendError, RasterBackend};
use super::fonts::FontHandle;
use super::layout::LayoutContext;
use super::options::{SOCIAL_IMAGE_QUALITY, SocialImageOptions};
use super::resvg_backend::ResvgBackend;
use super::SOCIAL_IMAGE_EXTENSION;
use crate::config::SiteConfig;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("Raster error: {0}")]
    Raster(String),
    #[error("Encode error: {0}")]
    Encode(String),
}

impl From<BackendError> for SocialImageError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Svg(msg) => Self::Svg(msg),
            BackendError::Raster(msg) => Self::Raster(msg),
            BackendError::Encode(msg) => Self::Encode(msg),
        }
    }
}

/// Everything needed to produce one page's image, detached from the renderer.
#[derive(Debug, Clone)]
pub struct SocialImageJob {
    pub title: String,
    pub description: String,
    /// File name without extension, e.g. `notes-rust`.
    pub file_name: String,
    /// Directory the image is written to.
    pub output_dir: PathBuf,
    pub options: SocialImageOptions,
    pub site: Arc<SiteConfig>,
    pub fonts: Arc<FontHandle>,
}

impl SocialImageJob {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{SOCIAL_IMAGE_EXTENSION}", self.file_name))
    }

    /// Run on the rayon pool. The receiver yields exactly one outcome.
    pub fn spawn<B>(self, generator: Arc<SocialImageGenerator<B>>) -> Receiver<JobOutcome>
    where
        B: RasterBackend + 'static,
    {
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let result = generator.generate(&self);
            // Receiver may have been dropped; nothing left to notify
            tx.send(JobOutcome {
                file_name: self.file_name,
                result,
            })
            .ok();
        });
        rx
    }
}

/// Result of one job, tagged with the image it was for.
#[derive(Debug)]
pub struct JobOutcome {
    pub file_name: String,
    pub result: Result<PathBuf, SocialImageError>,
}

/// Progress events emitted by [`generate_all`].
#[derive(Debug, Clone, PartialEq)]
pub enum SocialImageEvent {
    Generated { file_name: String, path: PathBuf },
    Failed { file_name: String, error: String },
}

impl SocialImageEvent {
    fn from_outcome(file_name: &str, result: &Result<PathBuf, SocialImageError>) -> Self {
        match result {
            Ok(path) => Self::Generated {
                file_name: file_name.to_string(),
                path: path.clone(),
            },
            Err(e) => Self::Failed {
                file_name: file_name.to_string(),
                error: e.to_string(),
            },
        }
    }
}

/// Renders jobs through a raster backend.
pub struct SocialImageGenerator<B: RasterBackend = ResvgBackend> {
    backend: B,
}

impl SocialImageGenerator<ResvgBackend> {
    pub fn new() -> Self {
        Self::with_backend(ResvgBackend::new())
    }
}

impl Default for SocialImageGenerator<ResvgBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RasterBackend> SocialImageGenerator<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Layout → rasterize → encode → write. Returns the written path.
    pub fn generate(&self, job: &SocialImageJob) -> Result<PathBuf, SocialImageError> {
        let fonts = job.fonts.get();
        let options = &job.options;
        let ctx = LayoutContext {
            config: &job.site,
            colors: job.site.colors.scheme(options.color_scheme),
            width: options.width,
            height: options.height,
            title: &job.title,
            description: &job.description,
            fonts: &fonts,
        };
        let svg = options.layout.render(&ctx);
        tracing::debug!(
            file = %job.file_name,
            layout = options.layout.name(),
            width = options.width,
            height = options.height,
            "rendering social image"
        );

        let image = self
            .backend
            .rasterize(&svg, options.width, options.height, &fonts)?;
        let bytes = self.backend.encode(&image, SOCIAL_IMAGE_QUALITY)?;

        fs::create_dir_all(&job.output_dir)?;
        let path = job.output_path();
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Generate every job in parallel on the current rayon pool.
///
/// Failures don't stop the batch; each is reported in its outcome and, when
/// `events` is given, as a [`SocialImageEvent::Failed`].
pub fn generate_all<B: RasterBackend>(
    generator: &SocialImageGenerator<B>,
    jobs: &[SocialImageJob],
    events: Option<Sender<SocialImageEvent>>,
) -> Vec<JobOutcome> {
    jobs.par_iter()
        .map(|job| {
            let result = generator.generate(job);
            match &result {
                Ok(path) => tracing::info!(file = %job.file_name, path = %path.display(), "social image written"),
                Err(e) => tracing::warn!(file = %job.file_name, error = %e, "social image failed"),
            }
            if let Some(tx) = &events {
                tx.send(SocialImageEvent::from_outcome(&job.file_name, &result))
                    .ok();
            }
            JobOutcome {
                file_name: job.file_name.clone(),
                result,
            }
        })
        .collect()
}
