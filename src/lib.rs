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

//! Hyperlog is a leveled, size-rotating file logger with bounded retention.
//!
//! # Overview
//!
//! Log calls carry a severity level and structured [`Fields`]. Calls that
//! pass the active threshold are rendered into one text line each and
//! appended to a sequence-numbered file (`app0.log`, `app1.log`, ...). When
//! the current file reaches the configured size limit the logger rolls to the
//! next sequence number, and a background thread prunes the oldest files so
//! that at most a configured number remain.
//!
//! I/O failures never crash the host: they are delivered to a [`Trap`] the
//! application can supply. Calls issued before the startup file probe has
//! finished are buffered and replayed in order.
//!
//! # Examples
//!
//! ```no_run
//! use hyperlog::Fields;
//! use hyperlog::Logger;
//!
//! let logger = Logger::builder("app.log")
//!     .directory("logs")
//!     .max_file_size(10 * 1024 * 1024)
//!     .max_log_files(5)
//!     .build()
//!     .unwrap();
//!
//! logger.info(
//!     "peer connected",
//!     Fields::new()
//!         .component("Gateway")
//!         .instance("eu-1")
//!         .data(serde_json::json!({ "peer": "10.0.0.7" })),
//! );
//!
//! logger.close().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod color;
pub mod layout;
pub mod level;
pub mod rolling;
pub mod trap;

mod error;
mod logger;
mod record;

pub use color::LevelColors;
pub use error::Error;
pub use layout::TextLayout;
pub use level::LevelSet;
pub use logger::Logger;
pub use logger::LoggerBuilder;
pub use record::Fields;
pub use record::Record;
pub use rolling::RollingFileWriter;
pub use rolling::RollingFileWriterBuilder;
pub use trap::Trap;
