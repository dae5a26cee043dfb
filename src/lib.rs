//! Transpose Standard MIDI Files into alternate keys, one output file per
//! semitone shift.

pub mod batch;
pub mod config;
pub mod error;
pub mod general;
pub mod io;
pub mod job;
pub mod transpose;

#[cfg(test)]
mod test_support;

pub use batch::{run_batch, BatchReport};
pub use config::{load_config, Config};
pub use error::{ConfigError, Interrupted, TransposeError};
pub use general::cancel::{spawn_stdin_handler, CancelToken};
pub use general::status::{print_failure_report, ConsoleProgress, NoProgress, Progress};
pub use io::input::find_midi_files;
pub use io::output::output_path;
pub use job::{transpose_container, FailureSet, MidiTransposeJob};
pub use transpose::{transpose_note, Transposition};
