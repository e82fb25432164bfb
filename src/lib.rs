//! Tooling for preparing the web dashboard's machine-learning assets:
//! checkpoint conversion into a browser-loadable weights artifact and
//! generation of placeholder NumPy fixture arrays.

pub mod config;
pub mod convert;
pub mod model;
pub mod report;
pub mod synth;
