//! Pure search logic: intent shape and normalization, the query compiler, and pagination.
//!
//! Nothing in this crate performs I/O. The service layer feeds model output into
//! [`intent::SearchIntent::normalize`], hands the result to [`compile::compile`], and slices the
//! ranked rows with [`page::Page`].

pub mod compile;
pub mod intent;
pub mod page;
pub mod vocabulary;
