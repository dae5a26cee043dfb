//! Runs one transposition job per input file.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Interrupted;
use crate::general::cancel::CancelToken;
use crate::general::status::Progress;
use crate::job::{FailureSet, MidiTransposeJob};
use crate::transpose::Transposition;

#[derive(Debug, Default)]
pub struct BatchReport {
    processed: usize,
    failed: Vec<(PathBuf, FailureSet)>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Files with at least one failed shift, in processing order.
    pub fn failed_files(&self) -> impl Iterator<Item = &Path> {
        self.failed.iter().map(|(path, _)| path.as_path())
    }

    pub fn failures(&self) -> &[(PathBuf, FailureSet)] {
        &self.failed
    }
}

/// Transpose every file in `files` by every shift in `shifts`, in order.
///
/// Per-file failures are collected into the report. `Interrupted` stops the
/// whole batch immediately; remaining files are not touched.
pub fn run_batch(
    files: &[PathBuf],
    shifts: &[Transposition],
    cancel: &CancelToken,
    progress: &mut dyn Progress,
) -> Result<BatchReport, Interrupted> {
    let mut report = BatchReport::default();
    progress.start(files.len());

    for (index, path) in files.iter().enumerate() {
        let job = MidiTransposeJob::new(path);
        let failures = match job.run(shifts, cancel) {
            Ok(failures) => failures,
            Err(interrupted) => {
                progress.finish();
                info!(
                    path = %job.input().display(),
                    remaining = files.len() - index,
                    "Batch interrupted"
                );
                return Err(interrupted);
            }
        };
        report.processed += 1;
        progress.file_done(index + 1, path, &failures);
        if !failures.is_empty() {
            report.failed.push((path.clone(), failures));
        }
    }

    progress.finish();
    info!(
        files = report.processed,
        failed = report.failed.len(),
        "Batch finished"
    );
    Ok(report)
}
