pub mod config;
pub mod dto;
pub mod multipart;
pub mod roles;
pub mod transcriber;
