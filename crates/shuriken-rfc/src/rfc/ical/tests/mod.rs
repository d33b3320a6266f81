//! Cross-cutting parser/serializer test suite, built on shared fixtures.

mod fixtures;
mod round_trip;
