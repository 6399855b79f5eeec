//! Small helpers shared by services.

pub mod code_generator;
pub mod password;
pub mod url_normalizer;
