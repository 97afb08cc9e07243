//! Property-based tests for call-shape resolution
