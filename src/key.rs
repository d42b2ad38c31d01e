//! Key contract for the dictionary.
//!
//! `ChainDict` works over any key with value-equality semantics: `Eq` and
//! `Hash` must agree (`a == b` implies equal hashes), which the structure
//! relies on for bucket addressing. `DictKey` bundles those bounds with an
//! absent-key sentinel check so key types that can denote "no key at all"
//! (`Option<K>` being the canonical case) are rejected by operations that
//! require a concrete key.

use core::hash::Hash;

/// Bounds required of a dictionary key, plus the absent-sentinel check.
///
/// For ordinary key types `is_absent` is `false` and the `InvalidKey` error
/// paths are unreachable. Implementing the trait for a custom key type is a
/// one-line empty impl:
///
/// ```
/// use chain_dict::DictKey;
///
/// #[derive(PartialEq, Eq, Hash)]
/// struct UserId(u64);
/// impl DictKey for UserId {}
/// ```
pub trait DictKey: Eq + Hash {
    /// Whether this key denotes the absence of a key rather than a key.
    ///
    /// Operations that need a concrete key (`get`, `insert`, `set`,
    /// `update`, `remove`) fail with `InvalidKey` when this returns true;
    /// `contains_key` and `try_get` instead report a plain miss. That
    /// asymmetry is part of the dictionary's contract.
    fn is_absent(&self) -> bool {
        false
    }
}

macro_rules! impl_dict_key {
    ($($t:ty),* $(,)?) => {
        $(impl DictKey for $t {})*
    };
}

impl_dict_key!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, String, str, ()
);

impl<K: DictKey + ?Sized> DictKey for &K {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

/// `None` is the absent sentinel; a present but itself-absent inner key is
/// treated as absent too.
impl<K: DictKey> DictKey for Option<K> {
    fn is_absent(&self) -> bool {
        match self {
            Some(k) => k.is_absent(),
            None => true,
        }
    }
}
