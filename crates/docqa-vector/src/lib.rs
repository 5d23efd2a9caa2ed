//! docqa-vector
//!
//! Exact inner-product index over unit vectors. See `index`.

pub mod index;

pub use index::{dot_similarity, l2_normalize, VectorIndex};
