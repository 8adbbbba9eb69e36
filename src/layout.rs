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

//! The human-readable text layout.
//!
//! This is a formatting concern layered on top of the rotation engine: it
//! turns a [`Record`] into the line persisted to the file and, separately,
//! into the colorized line echoed to the console.

use colored::Colorize;
use jiff::tz::TimeZone;

use crate::color::LevelColors;
use crate::record::Record;

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S.%3f";

/// Width of the level label in rendered lines. Longer names are truncated,
/// shorter ones padded with spaces.
const LEVEL_WIDTH: usize = 5;

/// A layout that formats log records as text.
///
/// Output format:
///
/// ```text
/// [11-08-2024 22:44:57.172] [fatal] [Gateway::eu-1] connect : Hello fatal! : {"peers":3}
/// [11-08-2024 22:44:57.173] [error] [Gateway::eu-1] connect : Hello error!
/// [11-08-2024 22:44:57.174] [warn ] Hello warn!
/// ```
///
/// The console rendering additionally colors the level label (see
/// [`LevelColors`]) and honors the per-call message color hint. You can
/// customize the timezone of the timestamp by setting the `tz` field;
/// otherwise, the system timezone is used.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    /// Timezone override for rendered timestamps.
    pub tz: Option<TimeZone>,
    /// Console colors for level labels.
    pub colors: LevelColors,
}

impl TextLayout {
    /// Renders the line persisted to the log file, without the terminator.
    pub fn format(&self, record: &Record) -> Vec<u8> {
        self.render(record, false).into_bytes()
    }

    /// Renders the colorized line echoed to the console.
    pub fn format_console(&self, record: &Record) -> String {
        self.render(record, true)
    }

    fn render(&self, record: &Record, console: bool) -> String {
        let fields = record.fields();

        if fields.message_only {
            return match fields.message_color.filter(|_| console) {
                Some(color) => record.message().color(color).to_string(),
                None => record.message().to_string(),
            };
        }

        let mut parts = Vec::with_capacity(3);
        if let Some(function) = &fields.function {
            parts.push(function.clone());
        }
        if !record.message().is_empty() {
            let message = match fields.message_color.filter(|_| console) {
                Some(color) => record.message().color(color).to_string(),
                None => record.message().to_string(),
            };
            parts.push(message);
        }
        if let Some(data) = &fields.data {
            parts.push(data.to_string());
        }

        let time = match self.tz.clone() {
            Some(tz) => record.time().clone().with_time_zone(tz),
            None => record.time().clone(),
        };
        let time = time.strftime(TIMESTAMP_FORMAT);

        let label = level_label(record.level());
        let label = if console {
            self.colors.colorize_level(record.level(), &label).to_string()
        } else {
            label
        };

        let caller = match (&fields.component, &fields.instance) {
            (Some(component), Some(instance)) => format!(" [{component}::{instance}]"),
            (Some(component), None) => format!(" [{component}]"),
            (None, Some(instance)) => format!(" [{instance}]"),
            (None, None) => String::new(),
        };

        format!("[{time}] [{label}]{caller} {}", parts.join(" : "))
    }
}

fn level_label(level: &str) -> String {
    let mut label: String = level.chars().take(LEVEL_WIDTH).collect();
    while label.chars().count() < LEVEL_WIDTH {
        label.push(' ');
    }
    label
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::Zoned;

    use super::*;
    use crate::record::Fields;

    fn record_at(level: &str, message: &str, fields: Fields) -> Record {
        let time = Zoned::from_str("2024-08-11T22:44:57.172105+02:00[+02:00]").unwrap();
        Record::new(level, 0, message, fields).with_time(time)
    }

    #[test]
    fn test_file_line_with_all_fields() {
        let layout = TextLayout::default();
        let fields = Fields::new()
            .component("Gateway")
            .instance("eu-1")
            .function("connect")
            .data(serde_json::json!({ "peers": 3 }));
        let record = record_at("error", "link down", fields);

        let line = String::from_utf8(layout.format(&record)).unwrap();
        assert_eq!(
            line,
            "[11-08-2024 22:44:57.172] [error] [Gateway::eu-1] connect : link down : {\"peers\":3}"
        );
    }

    #[test]
    fn test_level_label_is_padded_and_truncated() {
        assert_eq!(level_label("warn"), "warn ");
        assert_eq!(level_label("error"), "error");
        assert_eq!(level_label("critical"), "criti");
    }

    #[test]
    fn test_component_without_instance() {
        let layout = TextLayout::default();
        let record = record_at("info", "up", Fields::new().component("Gateway"));
        let line = String::from_utf8(layout.format(&record)).unwrap();
        assert_eq!(line, "[11-08-2024 22:44:57.172] [info ] [Gateway] up");
    }

    #[test]
    fn test_message_only_bypasses_prefix() {
        let layout = TextLayout::default();
        let record = record_at("info", "raw line", Fields::new().message_only());
        let line = String::from_utf8(layout.format(&record)).unwrap();
        assert_eq!(line, "raw line");
    }

    #[test]
    fn test_file_line_is_never_colored() {
        let layout = TextLayout::default();
        let fields = Fields::new().message_color(colored::Color::Red);
        let record = record_at("warn", "plain", fields);
        let line = String::from_utf8(layout.format(&record)).unwrap();
        assert!(!line.contains('\x1b'));
    }
}
