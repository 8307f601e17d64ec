//! Waiting queue and ride history management for theme park rides.
//!
//! A [`park::Ride`] keeps a FIFO queue of visitors, moves them into its history
//! in batches of at most `max_rider` per cycle, and can store the history in a
//! plain comma separated file.

#[macro_use]
extern crate failure;

pub mod config;
pub mod demo;
pub mod park;
