//! Commit-reveal voting: commitment hashing and the local secret store.

pub mod commitment;
pub mod store;

pub use commitment::{Salt, commit, generate_salt, generate_salt_with, verify};
pub use store::{VoteCommitment, VoteStore};
