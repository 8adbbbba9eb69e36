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

//! The rotation engine: sequence-numbered log files with size-triggered
//! rollover and background retention pruning.

pub use rolling::DEFAULT_MAX_FILE_SIZE;
pub use rolling::DEFAULT_MAX_LOG_FILES;
pub use rolling::MIN_FILE_SIZE;
pub use rolling::RollingFileWriter;
pub use rolling::RollingFileWriterBuilder;
pub use scan::LogFile;
pub use scan::list_log_files;

mod prune;
mod rolling;
mod scan;
