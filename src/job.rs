//! One input file, many transpositions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use midly::{Smf, TrackEventKind};
use tracing::{debug, info, warn};

use crate::error::{Interrupted, Result, TransposeError};
use crate::general::cancel::CancelToken;
use crate::io::output::{output_path, save_container};
use crate::transpose::{transpose_message, Transposition};

/// Shifts that produced no output for one input file, with the cause of each.
///
/// When the input cannot be loaded every requested shift shares the same
/// cause.
#[derive(Debug, Clone, Default)]
pub struct FailureSet {
    failures: BTreeMap<Transposition, Arc<TransposeError>>,
}

impl FailureSet {
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn contains(&self, shift: Transposition) -> bool {
        self.failures.contains_key(&shift)
    }

    /// Failed shifts in ascending order.
    pub fn shifts(&self) -> impl Iterator<Item = Transposition> + '_ {
        self.failures.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Transposition, &TransposeError)> {
        self.failures.iter().map(|(shift, err)| (*shift, err.as_ref()))
    }

    fn record(&mut self, shift: Transposition, err: Arc<TransposeError>) {
        self.failures.insert(shift, err);
    }
}

/// Transpose every note-on and note-off key in `smf`. Every other event,
/// including its delta time, is left as is. Returns the number of rewritten
/// events.
pub fn transpose_container(smf: &mut Smf<'_>, shift: Transposition) -> usize {
    let mut rewritten = 0;
    for track in smf.tracks.iter_mut() {
        for event in track.iter_mut() {
            match &mut event.kind {
                TrackEventKind::Midi { message, .. } => {
                    if transpose_message(message, shift) {
                        rewritten += 1;
                    }
                }
                TrackEventKind::SysEx(_) | TrackEventKind::Escape(_) | TrackEventKind::Meta(_) => {}
            }
        }
    }
    rewritten
}

/// Writes one transposed copy of a MIDI file per requested shift.
#[derive(Debug, Clone)]
pub struct MidiTransposeJob {
    input: PathBuf,
}

impl MidiTransposeJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self { input: input.into() }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Parse the input once, then write `<name>_tp<shift>.mid` for each shift.
    ///
    /// A file that cannot be read or parsed fails every shift and creates no
    /// output. Otherwise a failure for one shift does not stop the others.
    /// Cancellation is checked before loading and around each shift, and
    /// returns `Err(Interrupted)` without finishing the remaining shifts.
    pub fn run(&self, shifts: &[Transposition], cancel: &CancelToken) -> std::result::Result<FailureSet, Interrupted> {
        debug_assert!(!shifts.is_empty(), "at least one transposition is required");
        cancel.check()?;

        let mut failures = FailureSet::default();
        let data = match fs::read(&self.input) {
            Ok(data) => data,
            Err(source) => {
                let err = TransposeError::Read { path: self.input.clone(), source };
                self.fail_all(&mut failures, shifts, err);
                return Ok(failures);
            }
        };
        let smf = match Smf::parse(&data) {
            Ok(smf) => smf,
            Err(source) => {
                let err = TransposeError::Parse { path: self.input.clone(), source };
                self.fail_all(&mut failures, shifts, err);
                return Ok(failures);
            }
        };

        for &shift in shifts {
            self.check_cancel(cancel, shift)?;
            if let Err(err) = self.write_shift(&smf, shift) {
                warn!(input = %self.input.display(), %shift, "Transposition failed: {}", err);
                failures.record(shift, Arc::new(err));
            }
        }
        if let Some(&last) = shifts.last() {
            self.check_cancel(cancel, last)?;
        }

        Ok(failures)
    }

    fn check_cancel(&self, cancel: &CancelToken, shift: Transposition) -> std::result::Result<(), Interrupted> {
        cancel.check().inspect_err(|_| {
            info!(input = %self.input.display(), %shift, "Interrupted while transposing");
        })
    }

    fn write_shift(&self, smf: &Smf<'_>, shift: Transposition) -> Result<PathBuf> {
        let mut copy = smf.clone();
        let notes = transpose_container(&mut copy, shift);
        let out = output_path(&self.input, shift);
        save_container(&copy, &out)?;
        debug!(output = %out.display(), %shift, notes, "Transposed");
        Ok(out)
    }

    fn fail_all(&self, failures: &mut FailureSet, shifts: &[Transposition], err: TransposeError) {
        warn!(input = %self.input.display(), "Could not load MIDI file: {}", err);
        let err = Arc::new(err);
        for &shift in shifts {
            failures.record(shift, Arc::clone(&err));
        }
    }
}
