//! Waveform capture for trace-enabled builds.
//!
//! A [`TraceSession`] is opened before the first cycle, bound to the model's
//! signal catalog plus the driver-owned `clock` and `reset` inputs, and
//! flushed when it is closed or dropped. The first recorded cycle lists every
//! value; later cycles list only the values that changed.

/// VCD writer.
pub mod vcd;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::common::SessionError;
use crate::common::constants::TRACE_TOP_SCOPE;
use crate::sim::{ClockedModel, SignalInfo};
pub use vcd::{VcdWriter, width_mask};

/// Path that selects standard output.
const STDOUT_PATH: &str = "-";

/// An open waveform bound to one model.
#[derive(Debug)]
pub struct TraceSession {
    path: PathBuf,
    writer: VcdWriter<Box<dyn TraceSink>>,
    masks: Vec<u64>,
    last: Option<Vec<u64>>,
    start: u64,
}

/// Byte sink for waveform output.
pub trait TraceSink: Write + std::fmt::Debug {}

impl<T: Write + std::fmt::Debug> TraceSink for T {}

impl TraceSession {
    /// Opens `path` (or stdout for `-`) and writes the header for `model`'s signals.
    ///
    /// `depth` caps scope nesting; dumps before `start` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Trace`] if the file cannot be created or written.
    pub fn open<M: ClockedModel>(
        path: &Path,
        model: &M,
        depth: usize,
        start: Option<u64>,
    ) -> Result<Self, SessionError> {
        let trace_err = |source: io::Error| SessionError::Trace {
            path: path.to_path_buf(),
            source,
        };
        let sink: Box<dyn TraceSink> = if path == Path::new(STDOUT_PATH) {
            Box::new(io::stdout())
        } else {
            Box::new(BufWriter::new(File::create(path).map_err(trace_err)?))
        };

        let mut signals = vec![SignalInfo::new("clock", 1), SignalInfo::new("reset", 1)];
        signals.extend(model.signals());
        let writer = VcdWriter::new(sink, &signals, TRACE_TOP_SCOPE, depth).map_err(trace_err)?;
        let masks = (0..writer.len())
            .map(|index| width_mask(writer.width(index)))
            .collect();

        let start = start.unwrap_or(0);
        info!(path = %path.display(), signals = writer.len(), start, "waveform opened");
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            masks,
            last: None,
            start,
        })
    }

    /// Returns the first cycle that is written.
    pub const fn start_cycle(&self) -> u64 {
        self.start
    }

    fn error(&self, source: io::Error) -> SessionError {
        SessionError::Trace {
            path: self.path.clone(),
            source,
        }
    }

    /// Samples `model` and records it at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Trace`] on write failure.
    pub fn dump<M: ClockedModel>(
        &mut self,
        time: u64,
        model: &M,
        clock: bool,
        reset: bool,
    ) -> Result<(), SessionError> {
        if time < self.start {
            return Ok(());
        }
        let mut values = Vec::with_capacity(self.masks.len());
        values.push(u64::from(clock));
        values.push(u64::from(reset));
        let sampled = self.masks.len().saturating_sub(2);
        values.extend((0..sampled).map(|index| model.sample(index)));
        for (value, mask) in values.iter_mut().zip(&self.masks) {
            *value &= mask;
        }
        self.record(time, values).map_err(|source| self.error(source))
    }

    fn record(&mut self, time: u64, values: Vec<u64>) -> io::Result<()> {
        let Some(last) = self.last.as_mut() else {
            self.writer.timestamp(time)?;
            self.writer.dump_all(&values)?;
            self.last = Some(values);
            return Ok(());
        };

        let mut stamped = false;
        for (index, (value, previous)) in values.into_iter().zip(last.iter_mut()).enumerate() {
            if value == *previous {
                continue;
            }
            if !stamped {
                self.writer.timestamp(time)?;
                stamped = true;
            }
            self.writer.change(index, value)?;
            *previous = value;
        }
        Ok(())
    }

    /// Flushes and closes the waveform.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Trace`] if the final flush fails.
    pub fn close(mut self) -> Result<(), SessionError> {
        debug!(path = %self.path.display(), "waveform closed");
        self.writer.flush().map_err(|source| self.error(source))
    }
}
