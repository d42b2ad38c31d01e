//! chain-dict: a single-threaded, separate-chaining hash dictionary with
//! load-factor driven growth and shrink.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a generic key→value container built from first principles, with
//!   a small surface that can be reasoned about invariant by invariant.
//! - Storage: an owned bucket array (`Vec` of buckets, each bucket a `Vec`
//!   of entries in insertion order). Addressing is `hash % capacity`; the
//!   whole array is replaced wholesale on resize.
//! - Load-factor band: capacity doubles when an insert would push
//!   `len / capacity` above 0.7 and halves when a removal leaves it below
//!   0.3, never dropping under the floor of 8 buckets. The crossing call
//!   pays the O(len) rehash inline.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no locks, no atomics);
//!   external serialization is the caller's problem.
//! - Unique keys: duplicate inserts fail with `DuplicateKey`; `set` is the
//!   one upsert path.
//! - Each entry stores its `u64` hash at insertion; rehashing indexes by
//!   the stored hash and never re-invokes `K: Hash`, so no user code runs
//!   while the table is mid-rebuild.
//! - Reentrancy: disallowed while probing runs user `Eq`/`Hash`; enforced
//!   by a debug-only guard, a no-op in release builds.
//!
//! Key contract
//! - `DictKey` bundles `Eq + Hash` with an absent-sentinel check so key
//!   types that can denote "no key" (`Option<K>`) are rejected with
//!   `InvalidKey` by the operations that need a concrete key. The lookup
//!   predicates (`contains_key`, `try_get`) instead report a plain miss.
//!   That asymmetry is deliberate and part of the contract.
//!
//! Errors
//! - Three kinds: `InvalidKey`, `DuplicateKey`, `KeyNotFound`. Validation
//!   runs before any structural change, so a failed call leaves the
//!   dictionary untouched. Failures are signals to the caller; nothing is
//!   retried or logged internally.
//!
//! Notes and non-goals
//! - No thread safety and no persistence.
//! - No iteration-order guarantee across buckets; order within a bucket is
//!   insertion order and survives in-place updates and interior removals.
//! - Hashing is pluggable only through the `BuildHasher` parameter
//!   (default `RandomState`).
//! - `copy_into`'s destination size is a documented precondition, not a
//!   checked error; a too-small destination panics.

mod dict;
mod dict_proptest;
pub mod key;
mod reentrancy;

// Public surface
pub use dict::{ChainDict, DictError, IntoIter, Iter, IterMut, Keys, Values, FLOOR_CAPACITY};
pub use key::DictKey;
