//! # Engine Module
//!
//! Stateful trial-generation logic built on the core containers: the
//! pluggable [`insertion`] contract that produces proposed coordinates for
//! grand-canonical and Widom-style moves. The Monte Carlo moves themselves,
//! and the energy evaluation that accepts or rejects them, live outside
//! this crate and consume the core's public contract.

pub mod insertion;
