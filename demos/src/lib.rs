#![deny(warnings, clippy::all, clippy::pedantic)]

mod hash_map;
