//! Library side of the `rt4k` command-line tool.

pub mod cli;
pub mod commands;
pub mod logging;
