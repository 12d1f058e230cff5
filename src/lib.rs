//! # msablocks - Block-wise Alignment Viewer
//!
//! Lays out a multiple sequence alignment read from FASTA in fixed-width
//! blocks, classifies every aligned character against its column consensus
//! and tracks ungapped sequence positions across blocks.
//!
//! ## Architecture
//!
//! The engine is a chain of pure steps, each in its own module:
//! - `fasta`: FASTA text to records
//! - `gaps`: ungapping and end-gap detection
//! - `consensus`: per-column consensus and cell classification
//! - `layout`: block partitioning with running ungapped offsets
//! - `lookup`: position queries against a finished layout
//! - `session`: the caller-owned value tying a run together
//!
//! Front ends consume the result without feeding back into it:
//! - `acquire`: file reading with transparent gzip
//! - `render`: plain-text / ANSI block view
//! - `event`, `ui`, `controller`: interactive terminal viewer

pub mod acquire;
pub mod consensus;
pub mod controller;
pub mod event;
pub mod fasta;
pub mod gaps;
pub mod layout;
pub mod lookup;
pub mod model;
pub mod render;
pub mod session;
pub mod ui;
