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

//! Color utilities for the console echo.

use std::collections::HashMap;

use colored::Color;
use colored::ColoredString;
use colored::Colorize;

/// Console colors for level names.
///
/// Levels without an entry are rendered uncolored. The defaults cover the six
/// standard level names; custom level sets can register their own colors via
/// [`LevelColors::set`].
#[derive(Debug, Clone)]
pub struct LevelColors {
    colors: HashMap<String, Color>,
}

impl Default for LevelColors {
    fn default() -> Self {
        let mut colors = HashMap::new();
        colors.insert("fatal".to_string(), Color::BrightRed);
        colors.insert("error".to_string(), Color::Red);
        colors.insert("warn".to_string(), Color::Yellow);
        colors.insert("info".to_string(), Color::BrightWhite);
        colors.insert("debug".to_string(), Color::Green);
        colors.insert("trace".to_string(), Color::BrightBlack);
        Self { colors }
    }
}

impl LevelColors {
    /// Creates an empty color map with no level colored.
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    /// Sets the color for the given level name.
    #[must_use]
    pub fn set(mut self, level: impl Into<String>, color: Color) -> Self {
        self.colors.insert(level.into(), color);
        self
    }

    /// Colorize a level label for console rendering.
    ///
    /// `text` is the padded label; `level` is the raw level name used for the
    /// color lookup.
    pub fn colorize_level(&self, level: &str, text: &str) -> ColoredString {
        match self.colors.get(level) {
            Some(color) => text.color(*color),
            None => ColoredString::from(text),
        }
    }
}
