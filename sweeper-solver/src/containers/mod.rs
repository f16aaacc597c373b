//! Containers used throughout the crate.

mod keyed_vec;

pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;

pub(crate) type HashMap<K, V> = fnv::FnvHashMap<K, V>;
pub(crate) type HashSet<V> = fnv::FnvHashSet<V>;
