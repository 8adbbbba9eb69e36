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

use hyperlog::Fields;
use hyperlog::Logger;

fn main() {
    let logger = Logger::builder("demo.log")
        .directory("logs")
        .max_file_size(4096)
        .max_log_files(3)
        .level("debug")
        .build()
        .unwrap();

    for i in 0..100 {
        logger.info(
            "heartbeat",
            Fields::new()
                .component("Demo")
                .instance("main")
                .data(serde_json::json!({ "iteration": i })),
        );
    }

    logger.error(
        "something broke",
        Fields::new().component("Demo").function("main"),
    );
    logger.trace("gated out at debug", Fields::new());

    logger.close().unwrap();
}
