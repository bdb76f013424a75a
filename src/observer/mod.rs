// src/observer/mod.rs

//! Observer contract, §4.7 / §2.7: a pure interface any UI, TUI, or plain
//! console sink can satisfy. The host only ever holds `Box<dyn Observer>`.

use crate::bus::{LogRecord, TaskCommand, TaskStatusEvent};

pub trait Observer: Send {
    fn on_log(&mut self, record: LogRecord);
    fn on_status(&mut self, event: TaskStatusEvent);
    /// Non-blocking poll; `None` if nothing is queued right now.
    fn next_command(&mut self) -> Option<TaskCommand>;
    fn terminated(&self) -> bool;
}

/// The built-in, non-GUI Observer: writes `[task_name]: message` to stdout
/// for each log record and one line per status event. Never produces
/// commands. This is what `--gui` asks for in a build with no real UI
/// attached, and what tests use to exercise the Observer boundary directly.
pub struct ConsoleObserver {
    terminated: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { terminated: false }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ConsoleObserver {
    fn on_log(&mut self, record: LogRecord) {
        print!("[{}]: {}", record.task_name, record.message);
        if !record.message.ends_with('\n') {
            println!();
        }
    }

    fn on_status(&mut self, event: TaskStatusEvent) {
        println!("[{}]: {:?}", event.name, event.status);
    }

    fn next_command(&mut self) -> Option<TaskCommand> {
        None
    }

    fn terminated(&self) -> bool {
        self.terminated
    }
}
