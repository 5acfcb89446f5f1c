//! # jadn — JADN Schema Validation, Analysis and JIDL Conversion
//!
//! JADN (JSON Abstract Data Notation) information models are JSON documents:
//! a `meta` object plus a `types` array of type definitions, each a
//! `[TypeName, BaseType, TypeOptions, TypeDesc, Fields]` tuple. This crate
//! loads such documents into a typed AST, validates them against the JADN
//! definition rules, analyzes their type-reference graph, and converts them
//! to and from JIDL, the equivalent textual interface definition language.
//!
//! ## Base types
//!
//! - Primitive: `Binary`, `Boolean`, `Integer`, `Number`, `String`
//! - Structured: `Enumerated`, `Choice`, `Array`, `ArrayOf`, `Map`, `MapOf`,
//!   `Record`
//!
//! ## Example JIDL
//!
//! ```text
//!        title: "Personnel"
//!        roots: ["Person"]
//!
//! Person = Record                                    // An individual
//!    1 name         String
//!    2 id           Integer                          // employee number
//!    3 email        String /email optional
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let schema = jadn::load_any(Path::new("personnel.jidl"))?;
//! let report = jadn::analyze(&schema)?;
//! assert!(report.undefined.is_empty());
//! println!("{}", jadn::dumps(&schema));
//! # Ok::<(), jadn::SchemaError>(())
//! ```

pub mod analyze;
pub mod ast;
pub mod canon;
pub mod check;
pub mod error;
pub mod jidl;
pub mod options;
pub mod registry;

pub use analyze::{analyze, build_deps, Analysis};
pub use ast::{is_builtin, BaseType, FieldDef, GenFieldDef, ItemDef, Schema, TypeDefinition};
pub use canon::{dump, dumps, load, load_any, loads};
pub use check::{check, check_with, MetaSchemaCodec};
pub use error::{Result, SchemaError};
