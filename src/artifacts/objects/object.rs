use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::Write;
use std::path::PathBuf;

/// Binary encoding of a record (object payload, index header, index entry)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(bytes: Bytes) -> Result<Self>
    where
        Self: Sized;
}

/// A storable object: a typed payload whose identity is the digest of the
/// framed content `"<kind> <len>\0<payload>"`.
pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn framed(&self) -> Result<Bytes> {
        frame(self.object_type(), &self.serialize()?)
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::digest(&self.framed()?))
    }

    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Prefix a payload with its `"<kind> <len>\0"` header
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Result<Bytes> {
    let mut framed = Vec::with_capacity(payload.len() + 32);
    write!(framed, "{} {}\0", object_type.as_str(), payload.len())?;
    framed.write_all(payload)?;

    Ok(Bytes::from(framed))
}
