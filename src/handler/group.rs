// src/handler/group.rs

use crate::errors::Result;
use crate::handler::{ChildHandle, Handler, OnReady};

/// No child. Used to express "all these others are ready" as a join point.
pub struct GroupHandler;

impl Handler for GroupHandler {
    fn execute(&self, on_ready: OnReady, _merge_stderr: bool) -> Result<Option<ChildHandle>> {
        on_ready.fire();
        Ok(None)
    }

    fn on_exit(&self) -> Result<()> {
        Ok(())
    }
}
