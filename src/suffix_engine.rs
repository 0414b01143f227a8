use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{Mode, SuffixConfig};

/// A source file and the sibling path it is copied or moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl FileTask {
    /// Returns `None` when `source` has no file name to attach the suffix to.
    pub fn new<P: AsRef<Path>>(source: P, suffix: &str) -> Option<Self> {
        let source = source.as_ref();
        let destination = add_suffix_to_file(source, suffix)?;
        Some(Self {
            source: source.to_path_buf(),
            destination,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Copied,
    Moved,
    SourceMissing,
    UnrecognizedMode,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TaskOutcome) {
        self.processed += 1;
        match outcome {
            TaskOutcome::Copied | TaskOutcome::Moved => self.succeeded += 1,
            TaskOutcome::Failed(_) => self.failed += 1,
            TaskOutcome::SourceMissing | TaskOutcome::UnrecognizedMode => self.skipped += 1,
        }
    }
}

#[derive(Debug)]
pub struct SuffixEngine {
    config: SuffixConfig,
}

impl SuffixEngine {
    pub fn new(config: SuffixConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for source in &self.config.files {
            let outcome = self.process_file(source);
            summary.record(&outcome);
        }

        info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Run finished"
        );
        summary
    }

    pub fn process_file(&self, source: &Path) -> TaskOutcome {
        let task = match FileTask::new(source, &self.config.suffix) {
            Some(task) if source.exists() => task,
            _ => {
                error!("No such file: {}", display_path(source));
                return TaskOutcome::SourceMissing;
            }
        };

        let src = display_path(&task.source);
        let dest = display_path(&task.destination);

        let (result, arrow, done) = match &self.config.mode {
            Mode::Copy => (copy_file(&task), "->", TaskOutcome::Copied),
            Mode::Move => (move_file(&task), "=>", TaskOutcome::Moved),
            Mode::Unrecognized(raw) => {
                error!(mode = %raw, "Mode is not recognized: {}", raw);
                return TaskOutcome::UnrecognizedMode;
            }
        };

        if let Err(e) = result {
            error!(src = %src, dest = %dest, "Failed to {} file: {:#}", self.config.mode, e);
            return TaskOutcome::Failed(format!("{:#}", e));
        }

        if let Err(e) = verify_destination(&task.destination) {
            error!(dest = %dest, "Destination missing after {}: {:#}", self.config.mode, e);
            return TaskOutcome::Failed(format!("{:#}", e));
        }

        info!("{} {} {}", src, arrow, dest);
        done
    }
}

/// Inserts `suffix` before the extension of the path's file name.
///
/// The extension starts at the last `.` of the file name, so `a.tar.gz`
/// becomes `a.tar<suffix>.gz` and `.bashrc` becomes `<suffix>.bashrc`.
/// Returns `None` for paths without a file name (`/`, `..`, empty).
pub fn add_suffix_to_file<P: AsRef<Path>>(path: P, suffix: &str) -> Option<PathBuf> {
    let path = path.as_ref();
    let bytes = path.file_name()?.as_encoded_bytes();

    let (stem, extension) = match bytes.iter().rposition(|&b| b == b'.') {
        Some(dot) => bytes.split_at(dot),
        None => (bytes, &bytes[bytes.len()..]),
    };

    // SAFETY: both halves come from splitting valid encoded bytes at an ASCII '.'.
    let (stem, extension) = unsafe {
        (
            OsStr::from_encoded_bytes_unchecked(stem),
            OsStr::from_encoded_bytes_unchecked(extension),
        )
    };

    let mut new_name = OsString::with_capacity(bytes.len() + suffix.len());
    new_name.push(stem);
    new_name.push(suffix);
    new_name.push(extension);

    Some(path.with_file_name(new_name))
}

/// Renders a path with forward slashes for log output.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn verify_destination(destination: &Path) -> Result<()> {
    if !destination.exists() {
        bail!("destination {} does not exist", display_path(destination));
    }
    Ok(())
}

// Copy never overwrites an existing destination.
fn copy_file(task: &FileTask) -> Result<()> {
    copy_with_attributes(&task.source, &task.destination, false)
}

// Move replaces an existing destination.
fn move_file(task: &FileTask) -> Result<()> {
    match fs::rename(&task.source, &task.destination) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(error = %e, "Rename failed, falling back to copy+remove");
            copy_then_remove(&task.source, &task.destination)
        }
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> Result<()> {
    copy_with_attributes(source, destination, true)?;
    fs::remove_file(source)
        .with_context(|| format!("Failed to remove original file {}", source.display()))?;
    Ok(())
}

/// Copies contents, permissions and modification time of `source`.
///
/// Without `overwrite` the destination is created with `create_new`, so an
/// existing file is never truncated.
fn copy_with_attributes(source: &Path, destination: &Path, overwrite: bool) -> Result<()> {
    let mut input = fs::File::open(source)
        .with_context(|| format!("Failed to open {}", source.display()))?;
    let metadata = input
        .metadata()
        .with_context(|| format!("Failed to read metadata of {}", source.display()))?;

    let mut options = fs::File::options();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut output = options
        .open(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;

    io::copy(&mut input, &mut output).with_context(|| {
        format!("Copy failed {} -> {}", source.display(), destination.display())
    })?;

    if let Err(e) = metadata.modified().and_then(|modified| output.set_modified(modified)) {
        warn!(dest = %display_path(destination), "Could not preserve modification time: {}", e);
    }
    output
        .set_permissions(metadata.permissions())
        .with_context(|| format!("Failed to set permissions on {}", destination.display()))?;
    Ok(())
}
