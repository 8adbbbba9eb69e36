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

//! Severity levels and the threshold gate.
//!
//! Levels are an ordered sequence of names, most severe first. A level's
//! ordinal is its position in that sequence, so a lower ordinal means a
//! higher severity. A record at level `L` passes the gate iff
//! `ordinal(L) <= ordinal(active)`.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Error;

/// The default level names, severity descending.
pub const DEFAULT_LEVELS: [&str; 6] = ["fatal", "error", "warn", "info", "debug", "trace"];

/// An ordered set of severity level names with an active threshold.
///
/// The active threshold can be changed concurrently with logging via
/// [`LevelSet::set_active`]; the level names themselves are fixed at
/// construction.
#[derive(Debug)]
pub struct LevelSet {
    names: Vec<String>,
    active: AtomicUsize,
}

impl LevelSet {
    /// Creates a new [`LevelSet`] from an ordered list of names, most severe
    /// first, and the name of the initially active threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, contains an empty or duplicate
    /// name, or if `active` is not a member of the list.
    pub fn new(names: Vec<String>, active: &str) -> Result<Self, Error> {
        if names.is_empty() {
            return Err(Error::new("levels must not be empty"));
        }

        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(Error::new("level names must not be empty"));
            }
            if names[..i].contains(name) {
                return Err(Error::new(format!("duplicate level name: {name}")));
            }
        }

        let set = LevelSet {
            names,
            active: AtomicUsize::new(0),
        };
        set.set_active(active)?;
        Ok(set)
    }

    /// Creates a [`LevelSet`] with the default names and the least severe
    /// level active, so that every level is enabled.
    pub fn standard() -> Self {
        let names = DEFAULT_LEVELS.iter().map(|s| s.to_string()).collect();
        LevelSet {
            names,
            active: AtomicUsize::new(DEFAULT_LEVELS.len() - 1),
        }
    }

    /// Returns the configured level names, severity descending.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the ordinal of `name`, or `None` if it is not a member.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns the ordinal of the active threshold.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Sets the active threshold to the level named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a member of this set. The previous
    /// threshold stays in effect in that case.
    pub fn set_active(&self, name: &str) -> Result<(), Error> {
        match self.ordinal(name) {
            Some(ordinal) => {
                self.active.store(ordinal, Ordering::Release);
                Ok(())
            }
            None => Err(Error::new(format!("unknown level: {name}"))),
        }
    }

    /// Whether a record with the given ordinal passes the threshold gate.
    pub fn enabled(&self, ordinal: usize) -> bool {
        ordinal <= self.active()
    }
}
