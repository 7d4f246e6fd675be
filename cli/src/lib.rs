//! ckptmerge-cli library - exposes modules for unit tests

pub mod app;
pub mod commands;
