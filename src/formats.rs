//! The supported binary formats for reading.

pub mod btmesh;
