pub mod manifest;
pub mod seed;
