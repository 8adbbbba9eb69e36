// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::Error;
use crate::Trap;
use crate::rolling::prune::Pruner;
use crate::rolling::scan::list_log_files;
use crate::trap::StderrTrap;

/// Minimum accepted value for the per-file size limit, in bytes.
pub const MIN_FILE_SIZE: u64 = 100;

/// Default per-file size limit: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Default number of log files kept on disk.
pub const DEFAULT_MAX_LOG_FILES: usize = 10;

/// A writer that appends to numbered log files, rolling to the next sequence
/// number once the current file reaches the size limit.
///
/// Files are named `<base><sequence><.ext>`, e.g. `app0.log`, `app1.log`.
/// On creation the writer resumes the newest existing file if it still has
/// room, or starts the next sequence number if it does not. Retention pruning
/// runs on a background thread after every file open and never blocks writes.
///
/// I/O failures are reported to the configured [`Trap`], never raised to the
/// caller: a writer whose file handle could not be opened silently drops
/// entries until the next rotation succeeds.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: Option<File>,
    pruner: Pruner,
}

impl RollingFileWriter {
    /// Creates a new [`RollingFileWriterBuilder`].
    #[must_use]
    pub fn builder(basedir: impl Into<PathBuf>, filename: impl Into<String>) -> RollingFileWriterBuilder {
        RollingFileWriterBuilder::new(basedir, filename)
    }

    /// Rolls to the next sequence number if the current file has reached the
    /// size limit.
    ///
    /// Called on every dispatch before the entry is written, so no entry ever
    /// lands in an over-size file. A file may still exceed the limit by at
    /// most one entry, since rotation happens between writes, not mid-write.
    pub fn rotate_if_needed(&mut self) {
        if self.state.current_filesize >= self.state.max_size {
            self.rotate();
        }
    }

    /// Appends one formatted entry to the current file.
    ///
    /// The size counter grows by the full buffer length even when the write
    /// fails partway: overcounting only hastens the next rotation, while
    /// undercounting would let a file grow without bound. If no file handle
    /// is open, the entry is dropped.
    pub fn write_entry(&mut self, buf: &[u8]) {
        let Some(file) = self.writer.as_mut() else {
            return;
        };

        self.state.current_filesize += buf.len() as u64;
        if let Err(err) = file.write_all(buf) {
            let err = Error::new("failed to write log entry").with_source(err);
            self.state.trap.trap(&err);
        }
    }

    /// Flushes the current file handle.
    pub fn flush(&mut self) -> Result<(), Error> {
        if let Some(file) = self.writer.as_mut() {
            file.flush().map_err(Error::from_io_error)?;
        }
        Ok(())
    }

    /// Flushes and closes the current file handle. Later entries are dropped.
    pub fn close(&mut self) -> Result<(), Error> {
        let result = self.flush();
        self.writer = None;
        result
    }

    /// The sequence number of the current file.
    pub fn sequence(&self) -> u64 {
        self.state.sequence
    }

    fn rotate(&mut self) {
        if let Some(mut file) = self.writer.take()
            && let Err(err) = file.flush()
        {
            let err = Error::new("failed to flush previous writer").with_source(err);
            self.state.trap.trap(&err);
        }

        self.state.sequence += 1;
        self.state.current_filesize = 0;
        self.writer = self.state.open_current();
        self.pruner.schedule();
    }
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Some(file) = self.writer.as_mut()
            && let Err(err) = file.flush()
        {
            let err = Error::new("failed to flush file writer on drop").with_source(err);
            self.state.trap.trap(&err);
        }
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    // required
    basedir: PathBuf,
    filename: String,

    // has default
    max_size: u64,
    max_files: usize,
    trap: Arc<dyn Trap>,
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`].
    ///
    /// `filename` is split at its last `.` into the base name and the
    /// extension; `app.log` yields files `app0.log`, `app1.log`, and so on,
    /// while a filename without a dot yields `app0`, `app1`, ...
    #[must_use]
    pub fn new(basedir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            basedir: basedir.into(),
            filename: filename.into(),
            max_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_LOG_FILES,
            trap: Arc::new(StderrTrap::default()),
        }
    }

    /// Set the maximum size of a log file in bytes. Must be at least
    /// [`MIN_FILE_SIZE`].
    #[must_use]
    pub fn max_file_size(mut self, n: u64) -> Self {
        self.max_size = n;
        self
    }

    /// Set the maximum number of log files to keep. Must be at least 1.
    #[must_use]
    pub fn max_log_files(mut self, n: usize) -> Self {
        self.max_files = n;
        self
    }

    /// Set the trap receiving I/O failures.
    #[must_use]
    pub fn trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    /// Builds the [`RollingFileWriter`].
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration: an empty filename or
    /// base name, a size limit below [`MIN_FILE_SIZE`], or a file count of
    /// zero. I/O failures during the startup probe are not errors; they are
    /// reported to the trap and the writer starts without a file handle.
    pub fn build(self) -> Result<RollingFileWriter, Error> {
        self.validate()?;

        let Self {
            basedir,
            filename,
            max_size,
            max_files,
            trap,
        } = self;

        let (base, suffix) = split_filename(&filename);

        let mut state = State {
            log_dir: basedir,
            base: base.to_string(),
            suffix: suffix.map(str::to_string),
            max_size,
            sequence: 0,
            current_filesize: 0,
            trap,
        };

        state.resume();

        let pruner = Pruner::spawn(
            state.log_dir.clone(),
            state.base.clone(),
            state.suffix.clone(),
            max_files,
            state.trap.clone(),
        );

        let writer = state.open_current();
        pruner.schedule();

        Ok(RollingFileWriter {
            state,
            writer,
            pruner,
        })
    }

    /// Checks the configured parameters without touching the filesystem.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.filename.is_empty() {
            return Err(Error::new("filename must not be empty"));
        }
        let (base, _) = split_filename(&self.filename);
        if base.is_empty() {
            return Err(Error::new("filename must contain a base name"));
        }
        if self.max_size < MIN_FILE_SIZE {
            return Err(Error::new(format!(
                "max file size must be at least {MIN_FILE_SIZE} bytes"
            )));
        }
        if self.max_files < 1 {
            return Err(Error::new("max log files must be at least 1"));
        }
        Ok(())
    }
}

/// Splits `app.log` into `("app", Some("log"))`; a trailing dot or no dot at
/// all yields no extension.
fn split_filename(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() => (base, Some(ext)),
        Some((base, _)) => (base, None),
        None => (filename, None),
    }
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    base: String,
    suffix: Option<String>,
    max_size: u64,
    sequence: u64,
    current_filesize: u64,
    trap: Arc<dyn Trap>,
}

impl State {
    /// Startup probe: pick up where an earlier process left off.
    ///
    /// The newest existing file is resumed when it still has room; a full one
    /// advances the sequence instead. A failed scan means "no files known"
    /// and falls back to sequence 0, which is safe because files are only
    /// ever opened in append mode.
    fn resume(&mut self) {
        let files = match list_log_files(&self.log_dir, &self.base, self.suffix.as_deref()) {
            Ok(files) => files,
            Err(err) => {
                let err = Error::new("failed to enumerate log files on startup").with_source(err);
                self.trap.trap(&err);
                return;
            }
        };

        if let Some(last) = files.last() {
            if last.size >= self.max_size {
                self.sequence = last.sequence + 1;
                self.current_filesize = 0;
            } else {
                self.sequence = last.sequence;
                self.current_filesize = last.size;
            }
        }
    }

    fn filename_for(&self, sequence: u64) -> PathBuf {
        let filename = match &self.suffix {
            Some(suffix) => format!("{}{sequence}.{suffix}", self.base),
            None => format!("{}{sequence}", self.base),
        };
        self.log_dir.join(filename)
    }

    /// Opens the current sequence file in append mode. An open failure is
    /// trapped and leaves the writer without a handle.
    fn open_current(&self) -> Option<File> {
        match open_file(&self.log_dir, &self.filename_for(self.sequence)) {
            Ok(file) => Some(file),
            Err(err) => {
                self.trap.trap(&err);
                None
            }
        }
    }
}

fn open_file(dir: &Path, filepath: &Path) -> Result<File, Error> {
    std::fs::create_dir_all(dir)
        .map_err(|err| Error::new("failed to create log directory").with_source(err))?;

    OpenOptions::new()
        .append(true)
        .create(true)
        .open(filepath)
        .map_err(|err| {
            Error::new(format!("failed to open log file: {}", filepath.display()))
                .with_source(err)
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;

    fn write_existing(dir: &Path, name: &str, len: usize) {
        fs::write(dir.join(name), "x".repeat(len)).unwrap();
    }

    fn generate_random_line() -> Vec<u8> {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        let mut line = (0..len)
            .map(|_| rng.sample(Alphanumeric))
            .collect::<Vec<u8>>();
        line.push(b'\n');
        line
    }

    #[test]
    fn test_split_filename() {
        assert_eq!(split_filename("app.log"), ("app", Some("log")));
        assert_eq!(split_filename("app"), ("app", None));
        assert_eq!(split_filename("app."), ("app", None));
        assert_eq!(split_filename("my.app.log"), ("my.app", Some("log")));
        assert_eq!(split_filename(".log"), ("", Some("log")));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        assert!(RollingFileWriter::builder(temp_dir.path(), "").build().is_err());
        assert!(RollingFileWriter::builder(temp_dir.path(), ".log").build().is_err());
        assert!(
            RollingFileWriter::builder(temp_dir.path(), "app.log")
                .max_file_size(99)
                .build()
                .is_err()
        );
        assert!(
            RollingFileWriter::builder(temp_dir.path(), "app.log")
                .max_log_files(0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_fresh_directory_starts_at_sequence_zero() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");

        let mut writer = RollingFileWriter::builder(&dir, "app.log").build().unwrap();
        assert_eq!(writer.sequence(), 0);

        writer.write_entry(b"hello\n");
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(dir.join("app0.log")).unwrap(), "hello\n");
    }

    #[test]
    fn test_startup_resumes_newest_file_with_room() {
        let temp_dir = TempDir::new().unwrap();
        write_existing(temp_dir.path(), "app3.log", 10);

        let mut writer = RollingFileWriter::builder(temp_dir.path(), "app.log")
            .max_file_size(MIN_FILE_SIZE)
            .build()
            .unwrap();
        assert_eq!(writer.sequence(), 3);

        writer.write_entry(b"resumed\n");
        writer.flush().unwrap();

        let content = fs::read_to_string(temp_dir.path().join("app3.log")).unwrap();
        assert_eq!(content, format!("{}resumed\n", "x".repeat(10)));
        assert!(!temp_dir.path().join("app0.log").exists());
    }

    #[test]
    fn test_startup_advances_past_full_file() {
        let temp_dir = TempDir::new().unwrap();
        write_existing(temp_dir.path(), "app3.log", MIN_FILE_SIZE as usize);

        let mut writer = RollingFileWriter::builder(temp_dir.path(), "app.log")
            .max_file_size(MIN_FILE_SIZE)
            .build()
            .unwrap();
        assert_eq!(writer.sequence(), 4);

        writer.rotate_if_needed();
        writer.write_entry(b"fresh\n");
        writer.flush().unwrap();
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("app4.log")).unwrap(),
            "fresh\n"
        );
    }

    #[test]
    fn test_rotation_bounds_file_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let max_size = 1000u64;

        let mut writer = RollingFileWriter::builder(temp_dir.path(), "app.log")
            .max_file_size(max_size)
            .max_log_files(100)
            .build()
            .unwrap();

        for _ in 0..200 {
            writer.rotate_if_needed();
            writer.write_entry(&generate_random_line());
        }
        writer.flush().unwrap();

        let files = list_log_files(temp_dir.path(), "app", Some("log")).unwrap();
        assert!(files.len() > 1, "expected at least one rotation");
        // no entry lands in an over-size file: each file exceeds the limit by
        // at most one entry (max 101 bytes)
        for file in &files {
            assert!(
                file.size <= max_size + 101,
                "file {} too large: {}",
                file.filepath.display(),
                file.size
            );
        }
    }

    #[test]
    fn test_size_counter_never_decreases_within_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = RollingFileWriter::builder(temp_dir.path(), "app.log")
            .max_file_size(10_000)
            .build()
            .unwrap();

        let mut previous = 0;
        for _ in 0..50 {
            writer.write_entry(&generate_random_line());
            assert!(writer.state.current_filesize > previous);
            previous = writer.state.current_filesize;
        }
    }

    #[test]
    fn test_pruning_keeps_file_count_bounded() {
        let temp_dir = TempDir::new().unwrap();
        let max_files = 3;

        let mut writer = RollingFileWriter::builder(temp_dir.path(), "app.log")
            .max_file_size(MIN_FILE_SIZE)
            .max_log_files(max_files)
            .build()
            .unwrap();

        for _ in 0..50 {
            writer.rotate_if_needed();
            writer.write_entry(&generate_random_line());
        }
        let final_sequence = writer.sequence();
        writer.flush().unwrap();
        drop(writer); // joins the pruner

        let files = list_log_files(temp_dir.path(), "app", Some("log")).unwrap();
        assert!(
            files.len() <= max_files,
            "expected at most {max_files} files, found {}",
            files.len()
        );
        // the newest files survive
        assert!(files.iter().any(|f| f.sequence == final_sequence));
    }

    #[test]
    fn test_entries_after_close_are_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = RollingFileWriter::builder(temp_dir.path(), "app.log").build().unwrap();

        writer.write_entry(b"kept\n");
        writer.close().unwrap();
        writer.write_entry(b"dropped\n");

        let content = fs::read_to_string(temp_dir.path().join("app0.log")).unwrap();
        assert_eq!(content, "kept\n");
    }
}
