//! Typed views over JSON:API documents.
//!
//! Everything in this module is a plain serde type mirroring the wire format:
//! top-level documents, resource objects, relationship objects, resource
//! identifiers, and error documents. Wire shapes live here and nowhere else;
//! the [`Resource`](crate::Resource) entity holds resolved values only.

mod document;
mod errors;
mod relationship;
mod resource;

pub use document::{Document, PrimaryData, RequestDocument};
pub use errors::{ErrorDocument, ErrorLinks, ErrorObject, ErrorSource};
pub use relationship::{Relationship, RelationshipData};
pub use resource::{Identifier, ResourceObject};
