//! MongoDB ObjectId identifiers

use bson::oid::ObjectId;

use super::{Identifier, IdentityStore};

/// Accepts 24 hex digit ObjectIds and canonicalises them to lowercase.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdIdentityStore;

impl ObjectIdIdentityStore {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityStore for ObjectIdIdentityStore {
    fn parse(&self, raw: &str) -> Option<Identifier> {
        ObjectId::parse_str(raw)
            .ok()
            .map(|oid| Identifier::new(oid.to_hex()))
    }
}
