//! Value Change Dump output.
//!
//! Thin layer over [`vcd_ng::Writer`] that maps the flat, dotted signal
//! catalog of a model onto nested VCD scopes and writes packed `u64` samples
//! as scalar or vector changes.

use std::fmt;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use vcd_ng::{IdCode, SimulationCommand, TimescaleUnit, Value, Writer};

use crate::sim::SignalInfo;

/// Widest signal a sample can carry.
const MAX_WIDTH: u32 = 64;

/// One declared variable.
#[derive(Debug, Clone)]
struct Var {
    scope: Vec<String>,
    leaf: String,
    width: u32,
}

impl Var {
    fn new(signal: &SignalInfo, top: &str, depth: usize) -> Self {
        let mut parts: Vec<&str> = signal.name.split('.').filter(|p| !p.is_empty()).collect();
        let leaf = parts.pop().unwrap_or("unnamed").to_string();
        let mut scope = vec![top.to_string()];
        let nested = depth.saturating_sub(1);
        let (kept, folded) = parts.split_at(parts.len().min(nested));
        scope.extend(kept.iter().map(|p| (*p).to_string()));
        let leaf = if folded.is_empty() {
            leaf
        } else {
            format!("{}.{leaf}", folded.join("."))
        };
        Self {
            scope,
            leaf,
            width: signal.width.clamp(1, MAX_WIDTH),
        }
    }
}

/// Returns the mask that keeps the low `width` bits.
pub const fn width_mask(width: u32) -> u64 {
    if width >= MAX_WIDTH {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

const fn level(high: bool) -> Value {
    if high { Value::V1 } else { Value::V0 }
}

/// Binary digits of `value`, most significant first, without leading zeros.
fn bits(value: u64) -> Vec<Value> {
    let len = (u64::BITS - value.leading_zeros()).max(1);
    (0..len).rev().map(|bit| level((value >> bit) & 1 == 1)).collect()
}

/// Streaming VCD writer over any byte sink.
///
/// Variables are addressed by their position in the signal list passed to
/// [`VcdWriter::new`], whatever order the header declares them in.
pub struct VcdWriter<W: Write> {
    inner: Writer<W>,
    ids: Vec<IdCode>,
    widths: Vec<u32>,
}

impl<W: Write> fmt::Debug for VcdWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VcdWriter")
            .field("vars", &self.ids.len())
            .finish_non_exhaustive()
    }
}

impl<W: Write> VcdWriter<W> {
    /// Writes the header for `signals` and returns the writer.
    ///
    /// Scopes come from the dotted signal names, all nested under `top`.
    /// At most `depth` scope levels are emitted; deeper components are folded
    /// into the variable name.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `out`.
    pub fn new(out: W, signals: &[SignalInfo], top: &str, depth: usize) -> io::Result<Self> {
        let vars: Vec<Var> = signals.iter().map(|s| Var::new(s, top, depth)).collect();
        let mut inner = Writer::new(out);

        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        inner.date(&format!("{secs} (seconds since epoch)"))?;
        inner.version(&format!("rtlemu {}", env!("CARGO_PKG_VERSION")))?;
        inner.timescale(1, TimescaleUnit::NS)?;

        let mut order: Vec<usize> = (0..vars.len()).collect();
        order.sort_by(|&a, &b| vars[a].scope.cmp(&vars[b].scope));

        let mut ids = vec![None; vars.len()];
        let mut open: Vec<&str> = Vec::new();
        for index in order {
            let var = &vars[index];
            let common = open
                .iter()
                .zip(&var.scope)
                .take_while(|(a, b)| **a == b.as_str())
                .count();
            for _ in common..open.len() {
                inner.upscope()?;
            }
            open.truncate(common);
            for name in &var.scope[common..] {
                inner.add_module(name)?;
                open.push(name);
            }
            ids[index] = Some(inner.add_wire(var.width, &var.leaf)?);
        }
        for _ in &open {
            inner.upscope()?;
        }
        inner.enddefinitions()?;

        let ids = ids.into_iter().flatten().collect();
        let widths = vars.iter().map(|v| v.width).collect();
        Ok(Self { inner, ids, widths })
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no variables are declared.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Declared width of variable `index`.
    pub fn width(&self, index: usize) -> u32 {
        self.widths.get(index).copied().unwrap_or(1)
    }

    /// Starts the block for simulation time `time`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the sink.
    pub fn timestamp(&mut self, time: u64) -> io::Result<()> {
        self.inner.timestamp(time)
    }

    /// Writes every value inside `$dumpvars`, one per declared variable.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the sink.
    pub fn dump_all(&mut self, values: &[u64]) -> io::Result<()> {
        self.inner.begin(SimulationCommand::Dumpvars)?;
        for (index, value) in values.iter().enumerate() {
            self.change(index, *value)?;
        }
        self.inner.end()
    }

    /// Writes the new value of variable `index`. Unknown indices are ignored.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the sink.
    pub fn change(&mut self, index: usize, value: u64) -> io::Result<()> {
        let (Some(&id), Some(&width)) = (self.ids.get(index), self.widths.get(index)) else {
            return Ok(());
        };
        let value = value & width_mask(width);
        if width == 1 {
            self.inner.change_scalar(id, level(value == 1))
        } else {
            self.inner.change_vector(id, &bits(value).into())
        }
    }

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.writer().flush()
    }

    /// Returns the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        self.inner.writer()
    }
}

impl<W: Write> Drop for VcdWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
