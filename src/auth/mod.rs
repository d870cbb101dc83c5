// src/auth/mod.rs
pub mod token;

pub use token::verify_upload_token;
