//! Filedrop Storage Library
//!
//! This crate provides the object storage abstraction used by the upload workflow.
//! It includes the Storage trait and implementations for S3 (and S3-compatible
//! providers) and the local filesystem.
//!
//! # Storage key format
//!
//! Every backend generates keys the same way: `{prefix}/{uuid}.{ext}`, where `ext`
//! is the extension of the submitted filename as written. Names without an
//! extension produce `{prefix}/{uuid}`. The prefix defaults to `uploads`.
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use filedrop_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
