//! Text and vector primitives behind workout search.
//!
//! Everything here is pure and synchronous. Stores and services decide where the data lives.

pub mod lexical;
pub mod muscle_vector;
pub mod paging;
pub mod trigram;
