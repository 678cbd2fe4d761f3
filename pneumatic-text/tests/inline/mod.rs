//! Inline token resolver tests

mod resolver;
