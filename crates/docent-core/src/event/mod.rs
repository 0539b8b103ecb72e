//! Event distribution for presentation layers.

pub mod bus;
