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

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::SystemTime;

use crate::Error;

/// A log file found on disk that belongs to one logger's file set.
#[derive(Debug, Clone)]
pub struct LogFile {
    /// Full path to the file.
    pub filepath: PathBuf,
    /// The sequence number parsed from the file name; a name with no digits
    /// carries sequence number 0.
    pub sequence: u64,
    /// Size of the file in bytes at scan time.
    pub size: u64,
    /// Creation time of the file; modification time on filesystems that do
    /// not record birth times.
    pub created: SystemTime,
}

// oldest is the least; true creation-time ties are rare given monotonic
// sequence numbers, and break by sequence
pub(crate) fn compare_logfile(a: &LogFile, b: &LogFile) -> Ordering {
    match a.created.cmp(&b.created) {
        Ordering::Equal => a.sequence.cmp(&b.sequence),
        ord => ord,
    }
}

/// Scans `dir` for files named `<base><digits|empty><.suffix|empty>` and
/// returns them ascending by creation time.
///
/// The directory is created if it does not exist; an empty result is "no
/// files", not an error. A file that vanishes between listing and stat is
/// skipped, as it raced with concurrent pruning. Any other I/O failure aborts
/// the scan: callers must treat a failed scan as "no files known", never as
/// "zero files", lest they delete data they merely failed to see.
pub fn list_log_files(dir: &Path, base: &str, suffix: Option<&str>) -> Result<Vec<LogFile>, Error> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new(format!("failed to create log dir: {}", dir.display()))
                    .with_source(err)
            })?;
            return Ok(vec![]);
        }
        Err(err) => {
            return Err(
                Error::new(format!("failed to read log dir: {}", dir.display())).with_source(err),
            );
        }
    };

    let mut files = vec![];
    for entry in read_dir {
        let entry = entry.map_err(|err| {
            Error::new(format!("failed to read log dir: {}", dir.display())).with_source(err)
        })?;

        let filename = entry.file_name();
        // if the filename is not a UTF-8 string, it is not ours.
        let Some(filename) = filename.to_str() else {
            continue;
        };
        let Some(sequence) = parse_sequence(filename, base, suffix) else {
            continue;
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            // raced with concurrent pruning
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(Error::new(format!(
                    "failed to stat log file: {}",
                    entry.path().display()
                ))
                .with_source(err));
            }
        };

        // the logger only creates files, not directories or symlinks
        if !metadata.is_file() {
            continue;
        }

        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(|err| {
                Error::new(format!(
                    "failed to read timestamps of log file: {}",
                    entry.path().display()
                ))
                .with_source(err)
            })?;

        files.push(LogFile {
            filepath: entry.path(),
            sequence,
            size: metadata.len(),
            created,
        });
    }

    files.sort_by(compare_logfile);
    Ok(files)
}

/// Parses the sequence number out of a file name of the exact form
/// `<base><digits|empty><.suffix|empty>`. Returns `None` for names that do
/// not belong to the file set.
fn parse_sequence(filename: &str, base: &str, suffix: Option<&str>) -> Option<u64> {
    let mut rest = filename.strip_prefix(base)?;

    if let Some(suffix) = suffix {
        rest = rest.strip_suffix(suffix)?;
        rest = rest.strip_suffix('.')?;
    }

    if rest.is_empty() {
        // no digits means sequence number 0
        return Some(0);
    }

    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    u64::from_str(rest).ok()
}
