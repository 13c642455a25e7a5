pub mod application;
pub mod commands;
pub mod manager;
pub mod package;
pub mod runtime;
