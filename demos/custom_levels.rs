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

use colored::Color;
use hyperlog::Fields;
use hyperlog::LevelColors;
use hyperlog::Logger;

fn main() {
    let colors = LevelColors::empty()
        .set("alert", Color::BrightRed)
        .set("notice", Color::Cyan)
        .set("chatter", Color::BrightBlack);

    let logger = Logger::builder("custom.log")
        .directory("logs")
        .levels(["alert", "notice", "chatter"])
        .level("notice")
        .level_colors(colors)
        .build()
        .unwrap();

    logger.log("alert", "disk almost full", Fields::new().component("Monitor"));
    logger.log(
        "notice",
        "rotated credentials",
        Fields::new().message_color(Color::Green),
    );
    logger.log("chatter", "not persisted at notice", Fields::new());

    logger.close().unwrap();
}
