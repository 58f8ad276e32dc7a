//! CSV output of the epidemic curve: one row of per-state counts for every snapshot.
use std::fs::{create_dir_all, File};
use std::io;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::{error, trace};
use serde_derive::{Deserialize, Serialize};

use crate::engine::SnapshotObserver;
use crate::error::SirError;
use crate::health::HealthState;
use crate::snapshot::StepSnapshot;

/// Where reports are written. Each report is stored at `<directory>/<file_prefix><name>.csv`.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub overwrite: bool,
}

impl ReportOptions {
    #[must_use]
    pub fn new() -> Self {
        ReportOptions {
            directory: PathBuf::from("."),
            file_prefix: String::new(),
            overwrite: false,
        }
    }

    pub fn directory(&mut self, directory: PathBuf) -> &mut Self {
        self.directory = directory;
        self
    }

    pub fn file_prefix(&mut self, file_prefix: String) -> &mut Self {
        self.file_prefix = file_prefix;
        self
    }

    /// Allow existing report files to be replaced.
    pub fn overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}.csv", self.file_prefix, name))
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsRow {
    pub time_step: u64,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

impl From<&StepSnapshot> for CountsRow {
    fn from(snapshot: &StepSnapshot) -> Self {
        CountsRow {
            time_step: snapshot.time_step,
            susceptible: snapshot.count(HealthState::Susceptible),
            infected: snapshot.count(HealthState::Infected),
            recovered: snapshot.count(HealthState::Recovered),
        }
    }
}

/// Writes a [`CountsRow`] per snapshot. Register it with
/// `SimulationEngine::add_observer` to record a whole run, then call
/// `SimulationEngine::finish_observers` to find out whether every row made it to disk.
pub struct CountsReport {
    writer: Writer<File>,
    path: PathBuf,
    failure: Option<SirError>,
}

impl CountsReport {
    pub const NAME: &'static str = "counts";

    /// Creates the report file and any missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns a `SirError::IoError` if the file exists and `options.overwrite` is not set,
    /// or if the directory or file cannot be created.
    pub fn create(options: &ReportOptions) -> Result<Self, SirError> {
        let path = options.path_for(Self::NAME);
        create_dir_all(&options.directory)?;
        if path.exists() && !options.overwrite {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "{} already exists; enable overwrite to replace it",
                    path.display()
                ),
            )
            .into());
        }
        trace!("creating counts report at {}", path.display());
        let file = File::create(&path)?;
        Ok(CountsReport {
            writer: Writer::from_writer(file),
            path,
            failure: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the row for `snapshot` and flushes it.
    ///
    /// # Errors
    ///
    /// Returns a `SirError` if the row cannot be written.
    pub fn write(&mut self, snapshot: &StepSnapshot) -> Result<(), SirError> {
        self.writer.serialize(CountsRow::from(snapshot))?;
        self.writer.flush()?;
        Ok(())
    }
}

impl SnapshotObserver for CountsReport {
    /// Writes the row. After the first failure the report stops writing, so the file never has
    /// gaps in the middle.
    fn on_snapshot(&mut self, snapshot: &StepSnapshot) {
        if self.failure.is_some() {
            return;
        }
        if let Err(e) = self.write(snapshot) {
            error!(
                "failed to write step {} to {}: {}",
                snapshot.time_step,
                self.path.display(),
                e
            );
            self.failure = Some(e);
        }
    }

    fn finish(&mut self) -> Result<(), SirError> {
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(self.writer.flush()?),
        }
    }
}
