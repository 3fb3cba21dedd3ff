//! Content-derived node identities.

use std::fmt;

use md5::{Digest, Md5};
use serde::{Serialize, Serializer};

/// Stable identity of a package, derived from its import path.
///
/// The identity is the 128-bit MD5 digest of the name. Equal names always give
/// equal identities, in this run and in every other one. Distinct names are
/// only *probabilistically* distinct: a collision would merge two packages into
/// one graph node, which for the number of packages a module graph holds is
/// not expected to happen in practice. MD5 is used as a checksum here, not for
/// any security property.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity([u8; 16]);

impl Identity {
    /// Hash a package name.
    pub fn of(name: &str) -> Self {
        let digest = Md5::digest(name.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex form used as the node id in DOT output.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::LowerHex for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self:x})")
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
