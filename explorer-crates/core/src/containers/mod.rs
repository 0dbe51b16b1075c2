//! Storage shared by the search tree and the integer constraint store.
mod keyed_vec;

use fnv::FnvBuildHasher;
pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;

/// A hash map with the deterministic FNV hasher, so iteration order does not vary between runs.
#[allow(clippy::disallowed_types, reason = "the single place the std map is named")]
pub type HashMap<K, V> = std::collections::HashMap<K, V, FnvBuildHasher>;
