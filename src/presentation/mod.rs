// Presentation layer - Command line entry
pub mod cli;
