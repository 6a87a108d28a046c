//! Progress reporting while a session runs

pub mod reporter;
