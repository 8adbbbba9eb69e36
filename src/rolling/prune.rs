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

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossbeam_channel::unbounded;

use crate::Error;
use crate::Trap;
use crate::rolling::scan::list_log_files;

#[derive(Debug)]
enum Message {
    Prune,
    Shutdown,
}

/// A handle to the background retention pruner.
///
/// Pruning runs on a dedicated thread so that the write path never waits on
/// directory scans or deletions. [`Pruner::schedule`] is fire-and-forget; the
/// worker is stopped and joined when the handle is dropped.
#[derive(Debug)]
pub(crate) struct Pruner {
    sender: Sender<Message>,
    handle: Option<JoinHandle<()>>,
}

impl Pruner {
    pub(crate) fn spawn(
        log_dir: PathBuf,
        base: String,
        suffix: Option<String>,
        max_files: usize,
        trap: Arc<dyn Trap>,
    ) -> Pruner {
        let (sender, receiver) = unbounded();

        let handle = std::thread::Builder::new()
            .name("hyperlog-pruner".to_string())
            .spawn(move || {
                loop {
                    match receiver.recv() {
                        Ok(Message::Prune) => {
                            // collapse a burst of requests into one scan
                            let mut shutdown = false;
                            while let Ok(message) = receiver.try_recv() {
                                if matches!(message, Message::Shutdown) {
                                    shutdown = true;
                                    break;
                                }
                            }
                            prune(&log_dir, &base, suffix.as_deref(), max_files, trap.as_ref());
                            if shutdown {
                                break;
                            }
                        }
                        Ok(Message::Shutdown) | Err(_) => break,
                    }
                }
            })
            .expect("failed to spawn the retention pruner thread");

        Pruner {
            sender,
            handle: Some(handle),
        }
    }

    /// Requests a pruning pass. Never blocks.
    pub(crate) fn schedule(&self) {
        let _ = self.sender.send(Message::Prune);
    }
}

impl Drop for Pruner {
    fn drop(&mut self) {
        const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

        let _ = self
            .sender
            .send_timeout(Message::Shutdown, SHUTDOWN_TIMEOUT);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Deletes the oldest matching files so that at most `max_files` remain.
///
/// Best-effort cleanup: a failed deletion is reported and the remaining files
/// are still visited. A failed scan means "no files known" and deletes
/// nothing.
fn prune(log_dir: &Path, base: &str, suffix: Option<&str>, max_files: usize, trap: &dyn Trap) {
    let files = match list_log_files(log_dir, base, suffix) {
        Ok(files) => files,
        Err(err) => {
            let err = Error::new("failed to enumerate log files for pruning").with_source(err);
            trap.trap(&err);
            return;
        }
    };

    if files.len() <= max_files {
        return;
    }

    let excess = files.len() - max_files;
    for file in files.iter().take(excess) {
        match fs::remove_file(&file.filepath) {
            Ok(()) => {}
            // already gone, raced with an external cleanup
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                let err = Error::new(format!(
                    "failed to remove old log: {}",
                    file.filepath.display()
                ))
                .with_source(err);
                trap.trap(&err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::trap::SilentTrap;

    fn seed_files(dir: &std::path::Path, count: u64) {
        for seq in 0..count {
            let mut f = File::create(dir.join(format!("app{seq}.log"))).unwrap();
            f.write_all(b"x").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(15));
        }
    }

    fn remaining(dir: &std::path::Path) -> Vec<u64> {
        let mut files = list_log_files(dir, "app", Some("log"))
            .unwrap()
            .iter()
            .map(|f| f.sequence)
            .collect::<Vec<_>>();
        files.sort_unstable();
        files
    }

    #[test]
    fn test_prune_keeps_newest_files() {
        let temp_dir = TempDir::new().unwrap();
        seed_files(temp_dir.path(), 6);

        prune(
            temp_dir.path(),
            "app",
            Some("log"),
            4,
            &SilentTrap::default(),
        );

        assert_eq!(remaining(temp_dir.path()), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_prune_within_limit_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        seed_files(temp_dir.path(), 3);

        prune(
            temp_dir.path(),
            "app",
            Some("log"),
            10,
            &SilentTrap::default(),
        );

        assert_eq!(remaining(temp_dir.path()), vec![0, 1, 2]);
    }

    #[test]
    fn test_scheduled_pruning_runs_in_background() {
        let temp_dir = TempDir::new().unwrap();
        seed_files(temp_dir.path(), 5);

        let pruner = Pruner::spawn(
            temp_dir.path().to_path_buf(),
            "app".to_string(),
            Some("log".to_string()),
            2,
            Arc::new(SilentTrap::default()),
        );
        pruner.schedule();
        drop(pruner); // joins the worker

        assert_eq!(remaining(temp_dir.path()), vec![3, 4]);
    }
}
