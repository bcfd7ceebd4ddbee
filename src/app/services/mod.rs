//! Core business logic services

pub mod byte_source;
pub mod file_processor;
pub mod jrdb_parser;
pub mod load_target;
pub mod ndjson_sink;
pub mod quality_check;
