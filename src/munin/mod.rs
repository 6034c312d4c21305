//! Munin plugin text output
//!
//! Both emitters walk the same [`graphs::GraphPlan`], so `config` declares
//! exactly the fields a later fetch fills in.

pub mod config;
pub mod graphs;
pub mod values;

pub use config::emit_config;
pub use graphs::{Graph, GraphPlan, Metric, MetricValue, Series};
pub use values::emit_values;

use crate::error::Result;
use std::io::Write;

/// Line-oriented sink for plugin output
pub trait PluginOutput {
    /// Write one line (without trailing newline)
    fn line(&mut self, line: &str) -> Result<()>;

    /// Write the blank line separating two graph sections
    fn blank(&mut self) -> Result<()> {
        self.line("")
    }
}

/// Collects output lines, used to inspect emitter output in tests
impl PluginOutput for Vec<String> {
    fn line(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes lines to any [`Write`] implementation, typically stdout
#[derive(Debug)]
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush without giving up the writer
    pub fn finish(self) -> Result<()> {
        self.into_inner().map(drop)
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> PluginOutput for WriterOutput<W> {
    fn line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}
