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

//! The logger: level-gated dispatch onto the rotation engine.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::thread::JoinHandle;

use crate::Error;
use crate::Trap;
use crate::layout::TextLayout;
use crate::level::LevelSet;
use crate::record::Fields;
use crate::record::Record;
use crate::rolling::RollingFileWriter;
use crate::rolling::RollingFileWriterBuilder;

pub use builder::LoggerBuilder;

mod builder;

/// Where log calls currently go.
///
/// The startup file probe runs on a spawned thread. Until it finishes, calls
/// are buffered in order; the probe then replays them through the normal
/// dispatch path and flips the state to live, all under the state lock, so a
/// call can never interleave with the drain.
#[derive(Debug)]
enum DispatchState {
    /// Startup probe still running; entries are queued in call order.
    Buffering(Vec<Record>),
    /// The file handle is ready; entries go straight to the writer.
    Live(RollingFileWriter),
    /// The logger was closed; entries are dropped.
    Closed,
}

/// A leveled logger writing to size-rotated, retention-pruned files.
///
/// Create one with [`Logger::builder`]. Log calls never return errors and
/// never block on disk housekeeping; I/O failures are delivered to the
/// configured [`Trap`].
///
/// # Examples
///
/// ```no_run
/// use hyperlog::Fields;
/// use hyperlog::Logger;
///
/// let logger = Logger::builder("app.log")
///     .directory("logs")
///     .level("info")
///     .build()
///     .unwrap();
///
/// logger.info("service started", Fields::new().component("Main"));
/// logger.debug("not persisted at info", Fields::new());
/// logger.close().unwrap();
/// ```
#[derive(Debug)]
pub struct Logger {
    shared: Arc<Shared>,
    probe: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug)]
pub(crate) struct Shared {
    levels: LevelSet,
    layout: TextLayout,
    line_terminator: String,
    trap: Arc<dyn Trap>,
    state: Mutex<DispatchState>,
}

impl Logger {
    /// Creates a new [`LoggerBuilder`].
    ///
    /// `filename` is split at its last `.` into base name and extension; see
    /// [`LoggerBuilder`] for the remaining parameters and their defaults.
    #[must_use]
    pub fn builder(filename: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(filename)
    }

    pub(crate) fn start(shared: Arc<Shared>, writer: RollingFileWriterBuilder) -> Logger {
        let probe_shared = shared.clone();
        let handle = std::thread::Builder::new()
            .name("hyperlog-open".to_string())
            .spawn(move || match writer.build() {
                Ok(writer) => probe_shared.make_live(writer),
                Err(err) => {
                    // parameters were validated before spawning, so this is
                    // an unexpected state; report it and drop the queue
                    probe_shared.trap.trap(&err);
                    *probe_shared.lock_state() = DispatchState::Closed;
                }
            })
            .expect("failed to spawn the log file probe thread");

        Logger {
            shared,
            probe: Mutex::new(Some(handle)),
        }
    }

    /// Logs `message` at the level named `level`.
    ///
    /// A name outside the configured level set is reported to the trap and
    /// the call is dropped.
    pub fn log(&self, level: &str, message: impl Into<String>, fields: Fields) {
        match self.shared.levels.ordinal(level) {
            Some(ordinal) => {
                let record = Record::new(level, ordinal, message, fields);
                self.shared.dispatch(record);
            }
            None => {
                let err = Error::new(format!("unknown level: {level}"));
                self.shared.trap.trap(&err);
            }
        }
    }

    /// Logs at the `fatal` level.
    pub fn fatal(&self, message: impl Into<String>, fields: Fields) {
        self.log("fatal", message, fields);
    }

    /// Logs at the `error` level.
    pub fn error(&self, message: impl Into<String>, fields: Fields) {
        self.log("error", message, fields);
    }

    /// Logs at the `warn` level.
    pub fn warn(&self, message: impl Into<String>, fields: Fields) {
        self.log("warn", message, fields);
    }

    /// Logs at the `info` level.
    pub fn info(&self, message: impl Into<String>, fields: Fields) {
        self.log("info", message, fields);
    }

    /// Logs at the `debug` level.
    pub fn debug(&self, message: impl Into<String>, fields: Fields) {
        self.log("debug", message, fields);
    }

    /// Logs at the `trace` level.
    pub fn trace(&self, message: impl Into<String>, fields: Fields) {
        self.log("trace", message, fields);
    }

    /// Returns the configured level names, severity descending.
    pub fn levels(&self) -> &[String] {
        self.shared.levels.names()
    }

    /// Sets the active threshold level.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a configured level; the previous
    /// threshold stays in effect.
    pub fn set_level(&self, name: &str) -> Result<(), Error> {
        self.shared.levels.set_active(name)
    }

    /// Flushes buffered entries and closes the current file handle.
    ///
    /// Waits for the startup probe first, so entries buffered before the file
    /// handle was ready are drained rather than lost. Idempotent; later log
    /// calls are dropped.
    pub fn close(&self) -> Result<(), Error> {
        let handle = {
            let mut probe = self.probe.lock().unwrap_or_else(|e| e.into_inner());
            probe.take()
        };
        if let Some(handle) = handle {
            let _ = handle.join();
        }

        let mut state = self.shared.lock_state();
        match std::mem::replace(&mut *state, DispatchState::Closed) {
            DispatchState::Live(mut writer) => writer.close(),
            _ => Ok(()),
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl Shared {
    pub(crate) fn new(
        levels: LevelSet,
        layout: TextLayout,
        line_terminator: String,
        trap: Arc<dyn Trap>,
    ) -> Shared {
        Shared {
            levels,
            layout,
            line_terminator,
            trap,
            state: Mutex::new(DispatchState::Buffering(vec![])),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn dispatch(&self, record: Record) {
        let mut state = self.lock_state();
        match &mut *state {
            DispatchState::Buffering(pending) => pending.push(record),
            DispatchState::Live(writer) => self.dispatch_live(writer, &record),
            DispatchState::Closed => {}
        }
    }

    /// The write path. The rotation check runs before the gate so that the
    /// size bookkeeping is settled for every call, whether or not this
    /// particular entry is persisted.
    fn dispatch_live(&self, writer: &mut RollingFileWriter, record: &Record) {
        writer.rotate_if_needed();

        if !self.levels.enabled(record.ordinal()) {
            return;
        }

        if !record.fields().no_console {
            println!("{}", self.layout.format_console(record));
        }

        let mut bytes = self.layout.format(record);
        bytes.extend_from_slice(self.line_terminator.as_bytes());
        writer.write_entry(&bytes);
    }

    /// Flips Buffering into Live, replaying queued entries in call order.
    fn make_live(&self, mut writer: RollingFileWriter) {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, DispatchState::Closed) {
            DispatchState::Buffering(pending) => {
                for record in &pending {
                    self.dispatch_live(&mut writer, record);
                }
                *state = DispatchState::Live(writer);
            }
            // closed before the probe finished; nothing to replay
            other => {
                *state = other;
                let _ = writer.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::color::LevelColors;

    fn test_shared() -> Shared {
        Shared::new(
            LevelSet::standard(),
            TextLayout {
                tz: None,
                colors: LevelColors::default(),
            },
            "\n".to_string(),
            Arc::new(crate::trap::SilentTrap::default()),
        )
    }

    fn record(shared: &Shared, level: &str, message: &str) -> Record {
        let ordinal = shared.levels.ordinal(level).unwrap();
        Record::new(level, ordinal, message, Fields::new().no_console())
    }

    #[test]
    fn test_buffering_queues_in_call_order() {
        let shared = test_shared();

        shared.dispatch(record(&shared, "info", "first"));
        shared.dispatch(record(&shared, "warn", "second"));
        shared.dispatch(record(&shared, "error", "third"));

        let state = shared.lock_state();
        let DispatchState::Buffering(pending) = &*state else {
            panic!("expected buffering state");
        };
        let messages = pending.iter().map(|r| r.message()).collect::<Vec<_>>();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_make_live_replays_then_goes_live() {
        let temp_dir = TempDir::new().unwrap();
        let shared = test_shared();

        shared.dispatch(record(&shared, "info", "queued one"));
        shared.dispatch(record(&shared, "info", "queued two"));

        let writer = RollingFileWriter::builder(temp_dir.path(), "app.log")
            .build()
            .unwrap();
        shared.make_live(writer);

        shared.dispatch(record(&shared, "info", "direct three"));

        {
            let mut state = shared.lock_state();
            let DispatchState::Live(writer) = &mut *state else {
                panic!("expected live state");
            };
            writer.flush().unwrap();
        }

        let content = fs::read_to_string(temp_dir.path().join("app0.log")).unwrap();
        let positions = ["queued one", "queued two", "direct three"]
            .map(|needle| content.find(needle).expect(needle));
        assert!(positions[0] < positions[1]);
        assert!(positions[1] < positions[2]);
    }

    #[test]
    fn test_closed_drops_entries() {
        let shared = test_shared();
        *shared.lock_state() = DispatchState::Closed;
        shared.dispatch(record(&shared, "fatal", "lost"));

        let state = shared.lock_state();
        assert!(matches!(&*state, DispatchState::Closed));
    }
}
