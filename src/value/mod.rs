//! Value codec for the store's wire format
//!
//! Bidirectional conversion between native JSON values and the tagged
//! union the store speaks on the wire.
//!
//! # Invariants
//!
//! - Encoding then decoding reproduces the native value, up to the
//!   integer/double unification and timestamps returning as ISO strings
//! - Encoding never fails: unrepresentable values degrade to string
//!   coercion
//! - Decoding never fails: unrecognized tags degrade to null

mod codec;
mod wire;

pub use codec::{decode, encode, encode_timestamp};
pub use wire::WireValue;
