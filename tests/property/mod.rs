//! Property-based tests for digest and ordering guarantees

mod determinism;
