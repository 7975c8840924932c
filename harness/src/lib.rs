//! Metronome Harness: synthetic domains and reference answers for the
//! search engine.
//!
//! The harness does NOT implement search. It supplies worlds that implement
//! [`metronome_search::SearchDomainV1`], a brute-force oracle that knows
//! their optimal costs, and canonical regimes shared by tests and
//! benchmarks.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod oracle;
pub mod regimes;
pub mod worlds;
