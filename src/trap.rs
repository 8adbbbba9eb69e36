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

//! Traps for errors that occur on the logging path.
//!
//! The logger never raises I/O failures into caller code. Instead, every
//! failed open, write, enumeration, or deletion is reported once to the
//! configured [`Trap`]. Host applications subscribe by supplying their own
//! implementation at construction time.

use std::fmt;
use std::io;
use std::io::Write;

use crate::Error;

/// An observer for errors encountered while logging.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle an error that occurred on the logging path.
    ///
    /// Implementations must not panic and should return quickly; traps are
    /// invoked from the write path and from the background pruning thread.
    fn trap(&self, err: &Error);
}

/// A default trap that sends errors to standard error if possible.
///
/// If standard error is not available, it does nothing.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct StderrTrap {}

impl Trap for StderrTrap {
    fn trap(&self, err: &Error) {
        let _ = writeln!(io::stderr(), "{err}");
    }
}

/// A trap that discards all errors.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct SilentTrap {}

impl Trap for SilentTrap {
    fn trap(&self, _: &Error) {}
}
