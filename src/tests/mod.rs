//! Cross-module property and fuzz tests.
