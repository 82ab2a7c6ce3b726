//! The single-shot lazy execution contract shared by all operators.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use snafu::{ensure, OptionExt};
use storage::Table;

use crate::{AlreadyExecuted, NotExecuted, Result};

/// An operator in a query pipeline.
///
/// [`Operator::execute`] is legal exactly once; [`Operator::output`] only
/// afterwards. Implementations provide [`Operator::on_execute`] and a
/// backing [`ExecutionState`]. Upstream results are read through
/// [`Operator::left_input_table`] / [`Operator::right_input_table`] from
/// within `on_execute`, where the caller guarantees that the upstreams have
/// been executed.
pub trait Operator: Debug + Send + Sync {
    /// The slot tracking this operator's execution.
    fn execution_state(&self) -> &ExecutionState;

    /// Left upstream operator, if any.
    fn left_input(&self) -> Option<&Arc<dyn Operator>> {
        None
    }

    /// Right upstream operator, if any.
    fn right_input(&self) -> Option<&Arc<dyn Operator>> {
        None
    }

    /// Computes the result table.
    fn on_execute(&self) -> Result<Arc<Table>>;

    /// Runs the operator, materialising its output.
    fn execute(&self) -> Result<()> {
        self.execution_state().begin()?;
        let output = self.on_execute()?;
        self.execution_state().set_output(output);
        Ok(())
    }

    /// The materialised result table.
    fn output(&self) -> Result<Arc<Table>> {
        self.execution_state().output()
    }

    /// Output of the left upstream.
    fn left_input_table(&self) -> Result<Arc<Table>> {
        self.left_input().context(NotExecuted)?.output()
    }

    /// Output of the right upstream.
    fn right_input_table(&self) -> Result<Arc<Table>> {
        self.right_input().context(NotExecuted)?.output()
    }
}

/// Tracks whether an operator has run and holds its result table.
#[derive(Debug, Default)]
pub struct ExecutionState {
    started: AtomicBool,
    output: RwLock<Option<Arc<Table>>>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the single execution; fails on every claim but the first.
    pub fn begin(&self) -> Result<()> {
        ensure!(!self.started.swap(true, Ordering::SeqCst), AlreadyExecuted);
        Ok(())
    }

    pub fn set_output(&self, table: Arc<Table>) {
        *self.output.write() = Some(table);
    }

    pub fn output(&self) -> Result<Arc<Table>> {
        self.output.read().as_ref().map(Arc::clone).context(NotExecuted)
    }
}
