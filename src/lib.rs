pub mod annotate;
pub mod config;
pub mod join;
pub mod merge;
pub mod pipeline;
pub mod table;
