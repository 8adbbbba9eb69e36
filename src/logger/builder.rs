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

use std::path::PathBuf;
use std::sync::Arc;

use jiff::tz::TimeZone;

use crate::Error;
use crate::Trap;
use crate::color::LevelColors;
use crate::layout::TextLayout;
use crate::level::LevelSet;
use crate::logger::Logger;
use crate::logger::Shared;
use crate::rolling::RollingFileWriterBuilder;
use crate::trap::StderrTrap;

/// A builder for configuring a [`Logger`].
///
/// ```
/// use hyperlog::Logger;
///
/// let logger = Logger::builder("app.log")
///     .directory(std::env::temp_dir().join("hyperlog-doc"))
///     .max_file_size(1024 * 1024)
///     .max_log_files(5)
///     .level("debug")
///     .build()
///     .unwrap();
/// # logger.close().unwrap();
/// ```
#[derive(Debug)]
pub struct LoggerBuilder {
    // required
    filename: String,

    // has default
    directory: PathBuf,
    max_size: u64,
    max_files: usize,
    levels: Option<Vec<String>>,
    level: Option<String>,
    colors: LevelColors,
    tz: Option<TimeZone>,
    line_terminator: String,
    trap: Arc<dyn Trap>,
}

impl LoggerBuilder {
    /// Creates a new [`LoggerBuilder`] for the given filename.
    ///
    /// The extension is whatever follows the last `.`; `app.log` produces
    /// files `app0.log`, `app1.log`, and so on in the target directory.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            directory: PathBuf::from("."),
            max_size: crate::rolling::DEFAULT_MAX_FILE_SIZE,
            max_files: crate::rolling::DEFAULT_MAX_LOG_FILES,
            levels: None,
            level: None,
            colors: LevelColors::default(),
            tz: None,
            line_terminator: "\r\n".to_string(),
            trap: Arc::new(StderrTrap::default()),
        }
    }

    /// Set the directory log files are written to. Defaults to the current
    /// directory; created on demand.
    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the maximum size of a log file in bytes. Defaults to 50 MiB; must
    /// be at least [`MIN_FILE_SIZE`](crate::rolling::MIN_FILE_SIZE).
    #[must_use]
    pub fn max_file_size(mut self, n: u64) -> Self {
        self.max_size = n;
        self
    }

    /// Set the maximum number of log files to keep. Defaults to 10; must be
    /// at least 1.
    #[must_use]
    pub fn max_log_files(mut self, n: usize) -> Self {
        self.max_files = n;
        self
    }

    /// Set the ordered level names, most severe first. Defaults to
    /// `fatal, error, warn, info, debug, trace`.
    #[must_use]
    pub fn levels(mut self, levels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the initially active threshold level. Defaults to the least
    /// severe configured level, enabling everything.
    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Set the console colors for level labels.
    #[must_use]
    pub fn level_colors(mut self, colors: LevelColors) -> Self {
        self.colors = colors;
        self
    }

    /// Set the timezone used for rendered timestamps. Defaults to the system
    /// timezone.
    #[must_use]
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Set the line terminator appended to every entry. Defaults to `\r\n`.
    #[must_use]
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    /// Set the trap receiving I/O failures.
    #[must_use]
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Builds the [`Logger`] and kicks off the startup file probe.
    ///
    /// Parameter validation happens here and is the only way construction
    /// fails; filesystem trouble during the probe goes to the trap instead.
    /// Calls made before the probe finishes are buffered and replayed in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty filename or base name, a size limit
    /// below the minimum, a file count of zero, or a level configuration
    /// whose active level is not a member of the ordered list.
    pub fn build(self) -> Result<Logger, Error> {
        let Self {
            filename,
            directory,
            max_size,
            max_files,
            levels,
            level,
            colors,
            tz,
            line_terminator,
            trap,
        } = self;

        let names = match levels {
            Some(names) => names,
            None => crate::level::DEFAULT_LEVELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        let active = match &level {
            Some(level) => level.clone(),
            // default threshold is the least severe level
            None => names.last().cloned().unwrap_or_default(),
        };
        let levels = LevelSet::new(names, &active)?;

        let writer = RollingFileWriterBuilder::new(directory, filename)
            .max_file_size(max_size)
            .max_log_files(max_files)
            .trap(trap.clone());
        writer.validate()?;

        let layout = TextLayout { tz, colors };
        let shared = Arc::new(Shared::new(levels, layout, line_terminator, trap));
        Ok(Logger::start(shared, writer))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_invalid_parameters_fail_construction() {
        let temp_dir = TempDir::new().unwrap();

        assert!(Logger::builder("").directory(temp_dir.path()).build().is_err());
        assert!(
            Logger::builder("app.log")
                .directory(temp_dir.path())
                .max_file_size(99)
                .build()
                .is_err()
        );
        assert!(
            Logger::builder("app.log")
                .directory(temp_dir.path())
                .max_log_files(0)
                .build()
                .is_err()
        );
        assert!(
            Logger::builder("app.log")
                .directory(temp_dir.path())
                .level("verbose")
                .build()
                .is_err()
        );
        assert!(
            Logger::builder("app.log")
                .directory(temp_dir.path())
                .levels(["alert", "alert"])
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::builder("app.log")
            .directory(temp_dir.path())
            .build()
            .unwrap();

        assert_eq!(
            logger.levels(),
            &["fatal", "error", "warn", "info", "debug", "trace"]
        );
        logger.close().unwrap();
    }
}
