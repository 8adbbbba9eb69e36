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

//! Log records and their structured fields.

use colored::Color;
use jiff::Zoned;

/// Structured fields attached to a single log call.
///
/// All fields are optional. `component` and `instance` identify the caller in
/// the rendered line; `function` names the call site; `data` is a free-form
/// JSON payload appended to the line.
///
/// # Examples
///
/// ```
/// use hyperlog::Fields;
///
/// let fields = Fields::new()
///     .component("Gateway")
///     .instance("eu-1")
///     .data(serde_json::json!({ "peers": 3 }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fields {
    /// Component (e.g. type) name that makes the log call.
    pub component: Option<String>,
    /// Instance name that makes the log call.
    pub instance: Option<String>,
    /// Function name that makes the log call.
    pub function: Option<String>,
    /// Free-form data payload, rendered as JSON at the end of the line.
    pub data: Option<serde_json::Value>,
    /// Suppress the console echo for this call.
    pub no_console: bool,
    /// Emit only the bare message, without timestamp/level/caller prefix.
    pub message_only: bool,
    /// Console color hint for the message text.
    pub message_color: Option<Color>,
}

impl Fields {
    /// Creates an empty [`Fields`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the component name.
    #[must_use]
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Sets the instance name.
    #[must_use]
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Sets the function name.
    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Sets the data payload.
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Suppresses the console echo for this call.
    #[must_use]
    pub fn no_console(mut self) -> Self {
        self.no_console = true;
        self
    }

    /// Emits only the bare message for this call.
    #[must_use]
    pub fn message_only(mut self) -> Self {
        self.message_only = true;
        self
    }

    /// Sets the console color hint for the message text.
    #[must_use]
    pub fn message_color(mut self, color: Color) -> Self {
        self.message_color = Some(color);
        self
    }
}

/// A single log record, captured at call time.
///
/// Records are created by the logger and carry everything needed to render
/// the line later, so that entries buffered before the file handle is ready
/// keep their original timestamps when replayed.
#[derive(Debug, Clone)]
pub struct Record {
    level: String,
    ordinal: usize,
    time: Zoned,
    message: String,
    fields: Fields,
}

impl Record {
    pub(crate) fn new(
        level: impl Into<String>,
        ordinal: usize,
        message: impl Into<String>,
        fields: Fields,
    ) -> Self {
        Self {
            level: level.into(),
            ordinal,
            time: Zoned::now(),
            message: message.into(),
            fields,
        }
    }

    /// The level name of this record.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// The level ordinal of this record; lower means more severe.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The time at which the log call was made.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The log message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The structured fields of this record.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[cfg(test)]
    pub(crate) fn with_time(mut self, time: Zoned) -> Self {
        self.time = time;
        self
    }
}
