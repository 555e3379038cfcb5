//! Document-tree access for dictionary pages.
//!
//! The extraction layer never touches markup directly; it works against the
//! [`DocumentNode`] trait, which any DOM-like tree can implement. This crate
//! also ships the workspace's own tree ([`Element`]) and a tolerant reader
//! ([`html::parse`]) that turns fetched dictionary-page markup into it.
//!
//! The reader is deliberately not a general-purpose HTML parser: it knows
//! just enough (nesting recovery for tables, entity decoding, comment and
//! script skipping) to make the page substructures we query reachable.

pub mod element;
pub mod html;
pub mod node;

pub use element::{Element, Node};
pub use html::{MarkupError, parse};
pub use node::DocumentNode;
