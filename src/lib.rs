//! vmdoc - annotate classes with their virtual members
//!
//! vmdoc keeps a class's annotation block in sync with the members it exposes
//! at runtime: virtual properties and methods become `@property`/`@method`
//! tags, and declared properties and methods the class lacks are written into
//! its body.
//!
//! ## Module Structure
//!
//! - `argument`: Method argument rendering
//! - `entries`: Pending member entries and their registry
//! - `docblock`: Annotation block parsing and serialization
//! - `reflect`: Class snapshots read from source files
//! - `generator`: The per-class pipeline (merge, sort, splice, write)
//! - `config`: Configuration file loading and parsing
//! - `cli`: Command-line interface layer

pub mod argument;
pub mod cli;
pub mod config;
pub mod docblock;
pub mod entries;
pub mod generator;
pub mod reflect;
