//! Scenic Core - Scene item identity, hit metadata, and session credentials
//!
//! This crate provides the foundational types shared by the viewer and the
//! resource proxy:
//! - Scene item identifiers and hit-test results
//! - Metadata projection from hits into display records
//! - Stream credentials and their shareable URL encoding
//! - Paged remote resources and the remote failure model

pub mod credentials;
pub mod failure;
pub mod hit;
pub mod item;
pub mod metadata;
pub mod query;
pub mod resource;

pub use credentials::{
    decode_credentials, encode_credentials, CredentialsError, Environment, StreamCredentials,
};
pub use failure::{Failure, FailureError, FailureResponse, RemoteError};
pub use hit::{BoundingBox, Hit, HitMetadata, Vector3};
pub use item::SceneItemId;
pub use metadata::{to_metadata, DisplayMetadata};
pub use resource::{
    DeleteOutcome, Page, PageRequest, ResourceData, ResourceKind, DEFAULT_PAGE_SIZE,
};
