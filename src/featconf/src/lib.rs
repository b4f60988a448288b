// featconf/src/lib.rs

pub mod cli;
