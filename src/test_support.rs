use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use midly::num::{u14, u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, PitchBend, Smf, Timing, TrackEvent, TrackEventKind};
use tracing_subscriber::fmt::MakeWriter;

/// Fresh, empty directory unique to this test process and `name`.
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("midi-batch-transposer-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn event(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
    TrackEvent { delta: u28::new(delta), kind }
}

fn midi(message: MidiMessage) -> TrackEventKind<'static> {
    TrackEventKind::Midi { channel: u4::new(0), message }
}

/// Two tracks: a conductor track with meta events only, and a piano track
/// with notes at both ends of the range mixed with other channel messages.
pub(crate) fn sample_smf() -> Smf<'static> {
    let conductor = vec![
        event(0, TrackEventKind::Meta(MetaMessage::TrackName(b"conductor"))),
        event(0, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))),
        event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)),
    ];
    let piano = vec![
        event(0, TrackEventKind::Meta(MetaMessage::TrackName(b"piano"))),
        event(0, midi(MidiMessage::ProgramChange { program: u7::new(0) })),
        event(0, midi(MidiMessage::NoteOn { key: u7::new(0), vel: u7::new(90) })),
        event(0, midi(MidiMessage::NoteOn { key: u7::new(60), vel: u7::new(100) })),
        event(120, midi(MidiMessage::Controller { controller: u7::new(64), value: u7::new(127) })),
        event(360, midi(MidiMessage::NoteOff { key: u7::new(60), vel: u7::new(0) })),
        event(0, midi(MidiMessage::NoteOn { key: u7::new(127), vel: u7::new(80) })),
        event(240, midi(MidiMessage::NoteOff { key: u7::new(0), vel: u7::new(64) })),
        event(0, midi(MidiMessage::PitchBend { bend: PitchBend(u14::new(8192)) })),
        event(0, midi(MidiMessage::NoteOff { key: u7::new(127), vel: u7::new(0) })),
        event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)),
    ];
    Smf {
        header: Header::new(Format::Parallel, Timing::Metrical(u15::new(480))),
        tracks: vec![conductor, piano],
    }
}

/// In-memory log sink for asserting on `tracing` output.
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuf {
    type Writer = SharedBuf;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
