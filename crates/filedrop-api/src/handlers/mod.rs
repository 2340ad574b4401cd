pub mod files;
pub mod sessions;
pub mod upload;
