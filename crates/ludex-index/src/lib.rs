//! Ludex Index - RediSearch implementation of the search-index seam.

pub mod index;

pub use index::RediSearchIndex;
