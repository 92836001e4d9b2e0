pub mod access;
pub mod token_source;
