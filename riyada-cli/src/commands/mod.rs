//! Subcommand arguments and handlers. Handlers return or write text; only
//! `main` touches the real stdin and stdout.

pub mod ai;
pub mod calc;
pub mod exercise;
