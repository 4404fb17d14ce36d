//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: ids, directions, colors, coordinates, and errors.

mod errors;
