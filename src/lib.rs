pub mod annotate;
pub mod chapter;
pub mod config;
pub mod driver;
pub mod errors;
pub mod flags;
pub mod headword;
mod information;
pub mod input;
pub mod merge;
pub mod output;
pub mod overrides;
pub mod references;
pub mod synth;
pub mod table;
