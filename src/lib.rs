//! Stubgen - Scaffold NUnit placeholder test files from C# source trees.
//!
//! Stubgen walks a directory of C# sources, extracts namespace/class/method
//! declarations with tree-sitter, and writes one `<Class>Tests.cs` NUnit
//! stub per discovered class. Processing runs through a bounded-concurrency
//! staged pipeline, so a single unreadable or malformed file never aborts a
//! run.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use stubgen::pipeline::{generate, PipelineConfig};
//! use stubgen::walker::{source_files, WalkOptions};
//!
//! let paths = source_files(Path::new("./my-project"), &WalkOptions::default()).unwrap();
//! let config = PipelineConfig::new("./out", 10);
//! let summary = generate(paths, &config);
//!
//! println!("wrote {} stubs", summary.stubs_written);
//! ```
//!
//! # Modules
//!
//! - [`walker`] - Source file enumeration with gitignore support
//! - [`model`] - Extracted code model (namespaces, classes, methods)
//! - [`extract`] - Tree-sitter based declaration extraction
//! - [`stub`] - Test stub synthesis and rendering
//! - [`writer`] - Artifact persistence
//! - [`pipeline`] - Staged bounded-concurrency orchestration

pub mod errors;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod stub;
pub mod walker;
pub mod writer;

// Re-export key types at crate root for convenience
pub use errors::StubgenError;
pub use extract::extract;
pub use model::{ClassEntry, CodeModel, NamespaceEntry};
pub use pipeline::{generate, PipelineConfig, RunSummary, DEFAULT_PARALLELISM};
pub use stub::{synthesize, TestStub};
pub use walker::{source_files, WalkError, WalkOptions};
pub use writer::{write_stub, WriteError};
