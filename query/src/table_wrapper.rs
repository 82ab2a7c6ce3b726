//! Leaf operator exposing a prebuilt table to a pipeline.

use std::sync::Arc;

use storage::Table;

use crate::operator::{ExecutionState, Operator};
use crate::Result;

/// Wraps an existing table so that pipelines can consume it as an operator
/// input.
#[derive(Debug)]
pub struct TableWrapper {
    table: Arc<Table>,
    state: ExecutionState,
}

impl TableWrapper {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            state: ExecutionState::new(),
        }
    }
}

impl Operator for TableWrapper {
    fn execution_state(&self) -> &ExecutionState {
        &self.state
    }

    fn on_execute(&self) -> Result<Arc<Table>> {
        Ok(Arc::clone(&self.table))
    }
}
