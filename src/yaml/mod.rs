//! YAML parsing for configuration files

pub mod parser;

pub use parser::{parse_yaml, parse_yaml_file};
