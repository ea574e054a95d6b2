pub mod config;
pub mod dataset;
pub mod parse;
pub mod predict;
pub mod render;
pub mod schema;
pub mod session;
pub mod table;
