// Output generation module

pub mod drawio;

pub use drawio::*;
