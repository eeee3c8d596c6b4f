//! CLI support for the `ifrate` binary.

pub mod args;
