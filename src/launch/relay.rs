//! Output relay and the "running <cli>..." indicator.
//!
//! All terminal writes go through one [`Console`] lock. The relays and the
//! indicator share a [`RelayState`]; whichever of them first claims it is the
//! only one that clears the indicator line, and the indicator re-checks the
//! state under the lock so it never draws over real output.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::watch;
use tokio::time::{Instant, interval_at};
use tracing::{debug, trace, warn};

/// Erases the indicator line.
pub const CLEAR_LINE: &str = "\r\x1b[2K";

/// Tracks whether the child has produced any output yet.
#[derive(Debug, Default)]
pub struct RelayState {
    output_started: AtomicBool,
}

impl RelayState {
    pub fn has_started(&self) -> bool {
        self.output_started.load(Ordering::Acquire)
    }

    /// Mark output as started. Returns `true` for exactly one caller.
    pub fn claim(&self) -> bool {
        !self.output_started.swap(true, Ordering::AcqRel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        })
    }
}

struct Sinks {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Sinks {
    fn get(&mut self, stream: Stream) -> &mut (dyn Write + Send) {
        match stream {
            Stream::Stdout => self.out.as_mut(),
            Stream::Stderr => self.err.as_mut(),
        }
    }

    fn clear_indicator(&mut self) {
        if let Err(e) = write_flush(self.out.as_mut(), CLEAR_LINE.as_bytes()) {
            debug!(error = %e, "failed to clear indicator line");
        }
    }
}

fn write_flush(w: &mut (dyn Write + Send), bytes: &[u8]) -> std::io::Result<()> {
    w.write_all(bytes)?;
    w.flush()
}

fn write_line(w: &mut (dyn Write + Send), line: &[u8]) -> std::io::Result<()> {
    w.write_all(line)?;
    w.write_all(b"\n")?;
    w.flush()
}

/// The parent's two output streams behind a single lock.
#[derive(Clone)]
pub struct Console {
    sinks: Arc<Mutex<Sinks>>,
}

impl Console {
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            sinks: Arc::new(Mutex::new(Sinks {
                out: Box::new(out),
                err: Box::new(err),
            })),
        }
    }

    /// The process's own stdout / stderr.
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }

    fn lock(&self) -> MutexGuard<'_, Sinks> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write one relayed line. The first line of the launch also clears the
    /// indicator when `clear` is set.
    fn emit_line(&self, state: &RelayState, stream: Stream, line: &[u8], clear: bool) {
        let mut sinks = self.lock();
        if state.claim() && clear {
            sinks.clear_indicator();
        }
        if let Err(e) = write_line(sinks.get(stream), line) {
            debug!(%stream, error = %e, "failed to write relayed line");
        }
    }

    /// Draw an indicator frame unless output has started. Returns whether
    /// the frame was drawn.
    fn draw_frame(&self, state: &RelayState, frame: &str) -> bool {
        let mut sinks = self.lock();
        if state.has_started() {
            return false;
        }
        let text = format!("\r\x1b[K{frame}");
        if let Err(e) = write_flush(sinks.out.as_mut(), text.as_bytes()) {
            debug!(error = %e, "failed to draw indicator");
        }
        true
    }

    fn finish_indicator(&self, state: &RelayState) {
        let mut sinks = self.lock();
        if state.claim() {
            sinks.clear_indicator();
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// Copy `reader` line by line to `stream` until end of stream.
///
/// Lines are split on `\n` (a trailing `\r` is dropped) and need not be
/// UTF-8. Returns the number of lines relayed.
pub async fn relay_lines<R>(
    reader: R,
    stream: Stream,
    console: Console,
    state: Arc<RelayState>,
    clear: bool,
) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    let mut count = 0;
    loop {
        match segments.next_segment().await {
            Ok(Some(mut line)) => {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                console.emit_line(&state, stream, &line, clear);
                count += 1;
            }
            Ok(None) => break,
            Err(e) => {
                warn!(%stream, error = %e, "reading child output failed");
                break;
            }
        }
    }
    trace!(%stream, lines = count, "relay drained");
    count
}

pub fn indicator_frames(label: &str) -> [String; 3] {
    let base = format!("running {label}");
    [format!("{base}."), format!("{base}.."), format!("{base}...")]
}

/// Animate the indicator every `period` until stopped or until output starts.
/// Clears the line on the way out unless a relay already did.
pub async fn run_indicator(
    label: String,
    console: Console,
    state: Arc<RelayState>,
    mut stop: watch::Receiver<bool>,
    period: Duration,
) -> usize {
    let frames = indicator_frames(&label);
    let mut ticker = interval_at(Instant::now() + period, period);
    let mut drawn = 0;

    loop {
        if *stop.borrow_and_update() {
            break;
        }
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if !console.draw_frame(&state, &frames[drawn % frames.len()]) {
                    break;
                }
                drawn += 1;
            }
        }
    }

    console.finish_indicator(&state);
    drawn
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// In-memory writer whose contents stay readable after being handed to a
    /// `Console`.
    #[derive(Clone, Default)]
    pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub fn contents(&self) -> String {
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
}
