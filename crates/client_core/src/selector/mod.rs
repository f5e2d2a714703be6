//! Derived queries over state. Every selector is total: missing data
//! yields `false`, `None`, `0` or an empty list.

pub mod county;
pub mod dos;
