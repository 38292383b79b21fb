//! Scene-graph model for reconstructed presentations.
//!
//! This module defines the immutable value structures a parsed package is
//! rebuilt into. Parsers convert part XML into these structures; consumers
//! (renderers, editors) walk them. Ownership is strictly parent-to-child:
//! a presentation owns its slides, a slide its elements, a group its
//! children. No entity holds a back-reference, so the tree is acyclic by
//! construction.

mod element;
mod paint;
mod presentation;
mod text;
mod theme;

pub use element::*;
pub use paint::*;
pub use presentation::*;
pub use text::*;
pub use theme::*;
