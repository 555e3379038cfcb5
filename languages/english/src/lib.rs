//! English-specific vocabulary handling.

mod phrasal;

pub use phrasal::PhrasalVerbTransform;
