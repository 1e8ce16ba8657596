//! GHDF value types and the wire type registry.

mod compound;
mod encoded_int;
pub mod kind;
mod value;

pub use compound::{Compound, FromValue, Iter};
pub use encoded_int::EncodedInt;
pub use kind::{ValueKind, WireType};
pub use value::{Array, Value};
