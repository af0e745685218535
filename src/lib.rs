//! Associative containers: hash and tree backed maps and sets with fail-fast cursors, and a
//! lock-striped concurrent hash map.
//!
//! # [`HashMap`] and [`HashSet`]
//! A separately chained hash map whose overloaded buckets are turned into red-black trees, with a
//! slot for the null key.
//!
//! # [`TreeMap`] and [`TreeSet`]
//! An ordered map backed by a red-black tree with navigation methods and live range views.
//!
//! # [`SetView`]
//! A set presented over any [`Map`] with unit values.
//!
//! # [`StripedMap`]
//! A thread-safe hash map partitioned into independently locked segments.
//!
//! # Fail-fast cursors
//! Cursors of the single-threaded containers detect structural modifications made behind their
//! back and fail with [`Error::StructuralChange`] instead of returning stale entries.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
pub use config::Config;

mod cursor;
pub use cursor::CursorState;

mod equivalent;
pub use crate::equivalent::{Comparable, Equivalent};

mod error;
pub use error::Error;

mod map;
pub use map::Map;

pub mod hash_map;
pub use hash_map::HashMap;

pub mod tree_map;
pub use tree_map::TreeMap;

pub mod set_view;
pub use set_view::{HashSet, SetView, TreeSet};

pub mod striped_map;
pub use striped_map::StripedMap;

mod hash_table;
mod rb_tree;
