pub mod cli;
pub mod commands;
