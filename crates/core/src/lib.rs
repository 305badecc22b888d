//! Core library for marknote
//!
//! This crate implements the **Functional Core** of the marknote application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The marknote project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`marknote_core`** (this crate): the markdown pipeline, domain models and their
//!   transformations, and the flat-file record store
//! - **`marknote`**: CLI, HTTP server, configuration and terminal output (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! Everything except [`store`] is free of I/O:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **Explicit time**: operations that stamp records take `now` as an argument
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`markdown`]: Markdown to safe HTML (heading cleanup, rendering, allow-list sanitization)
//! - [`block`]: The content block entity (raw markdown plus its sanitized HTML)
//! - [`todo`]: To-do items and their transformations
//! - [`post`]: Blog posts and their transformations
//! - [`store`]: JSON record files, overwritten wholesale on save
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use marknote_core::markdown::render;
//!
//! let html = render("# Shopping List\n- [ ] milk\n- [x] eggs\n")?;
//!
//! assert!(html.contains("<h1>Shopping List</h1>"));
//! assert!(html.contains(r#"type="checkbox""#));
//! ```

pub mod block;
pub mod markdown;
pub mod post;
pub mod store;
pub mod todo;
