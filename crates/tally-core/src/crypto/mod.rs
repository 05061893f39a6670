pub mod address;
pub mod hash;

pub use address::Address;
pub use hash::{hash_blake3, Hash};
