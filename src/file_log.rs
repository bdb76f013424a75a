// src/file_log.rs

//! `--file-output DIR`: mirror each task's log records into
//! `DIR/<task>_<DD-MM-YYYY_HH-MM-SS>.log`, one file opened once per task.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::bus::LogRecord;

pub struct FileLogMirror {
    dir: PathBuf,
    files: HashMap<String, File>,
}

impl FileLogMirror {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            files: HashMap::new(),
        })
    }

    /// Append one record to its task's file, opening the file on first use.
    pub fn write(&mut self, record: &LogRecord) {
        let file = match self.files.get_mut(&record.task_name) {
            Some(f) => f,
            None => match self.open_for(&record.task_name) {
                Ok(f) => self.files.entry(record.task_name.clone()).or_insert(f),
                Err(e) => {
                    tracing::warn!(task = %record.task_name, error = %e, "could not open per-task log file");
                    return;
                }
            },
        };
        let _ = write!(file, "{}", record.message);
        if !record.message.ends_with('\n') {
            let _ = writeln!(file);
        }
    }

    fn open_for(&self, task_name: &str) -> std::io::Result<File> {
        let stamp = chrono::Local::now().format("%d-%m-%Y_%H-%M-%S");
        let path: PathBuf = Path::join(&self.dir, format!("{task_name}_{stamp}.log"));
        OpenOptions::new().create(true).append(true).open(path)
    }
}
