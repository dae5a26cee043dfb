use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::batch::BatchReport;
use crate::job::FailureSet;

/// Observer notified as the batch advances. Never affects outcomes.
pub trait Progress {
    fn start(&mut self, _total: usize) {}
    /// `index` is 1-based.
    fn file_done(&mut self, _index: usize, _path: &Path, _failures: &FailureSet) {}
    fn finish(&mut self) {}
}

#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// `3/12 25%` on a single, rewritten line.
pub struct ConsoleProgress {
    stdout: StandardStream,
    total: usize,
    line_open: bool,
}

impl ConsoleProgress {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            total: 0,
            line_open: false,
        }
    }
}

impl Progress for ConsoleProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
    }

    fn file_done(&mut self, index: usize, _path: &Path, failures: &FailureSet) {
        let percent = 100 * index / self.total.max(1);
        let color = if failures.is_empty() { Color::Green } else { Color::Yellow };
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)));
        let _ = write!(&mut self.stdout, "{}/{} {}%", index, self.total, percent);
        let _ = self.stdout.reset();
        if index < self.total {
            let _ = write!(&mut self.stdout, "\r");
            self.line_open = true;
        } else {
            let _ = writeln!(&mut self.stdout);
            self.line_open = false;
        }
        let _ = self.stdout.flush();
    }

    fn finish(&mut self) {
        if self.line_open {
            let _ = writeln!(&mut self.stdout);
            self.line_open = false;
        }
    }
}

/// Write the end-of-run summary: every file with at least one failed shift,
/// and why each shift failed.
pub fn write_failure_report(out: &mut impl WriteColor, report: &BatchReport) -> std::io::Result<()> {
    if report.is_success() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_intense(true))?;
        writeln!(out, "Transposed {} midi file(s)", report.processed())?;
        return out.reset();
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_intense(true))?;
    writeln!(out, "error occured when transposing midi files below")?;
    out.reset()?;
    for (path, failures) in report.failures() {
        writeln!(out, "{}", path.display())?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        for (shift, err) in failures.iter() {
            writeln!(out, "  tp{}: {}", shift, err)?;
        }
        out.reset()?;
    }
    Ok(())
}

pub fn print_failure_report(report: &BatchReport, choice: ColorChoice) {
    let mut stdout = StandardStream::stdout(choice);
    let _ = write_failure_report(&mut stdout, report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::run_batch;
    use crate::general::cancel::CancelToken;
    use crate::test_support::{sample_smf, scratch_dir};
    use crate::transpose::Transposition;
    use termcolor::Buffer;

    #[test]
    fn test_report_lists_failed_files_and_shifts() {
        let dir = scratch_dir("status_report");
        let good = dir.join("good.mid");
        let bad = dir.join("bad.mid");
        sample_smf().save(&good).unwrap();
        std::fs::write(&bad, b"garbage").unwrap();

        let shifts = [Transposition::new(-2).unwrap(), Transposition::new(5).unwrap()];
        let report = run_batch(&[bad.clone(), good], &shifts, &CancelToken::new(), &mut NoProgress).unwrap();

        let mut buf = Buffer::no_color();
        write_failure_report(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "error occured when transposing midi files below");
        assert_eq!(lines[1], bad.display().to_string());
        assert!(lines[2].starts_with("  tp-2: failed to parse"));
        assert!(lines[3].starts_with("  tp5: failed to parse"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_report_for_clean_run() {
        let report = BatchReport::default();
        let mut buf = Buffer::no_color();
        write_failure_report(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert_eq!(text, "Transposed 0 midi file(s)\n");
    }
}
