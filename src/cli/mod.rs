mod demo;
mod dialog;
mod root;

pub use root::Cli;
