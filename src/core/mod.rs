// src/core/mod.rs
pub mod bloom;
pub mod hash;
pub mod lexicon;
pub mod normalizer;
pub mod types;
pub mod word_set;
