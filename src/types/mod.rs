/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types and traits that are used across multiple components of the crate.
//!
//! Types specific to a single component, e.g., the errors of the [quorum coordinator](crate::quorum),
//! are defined next to that component.

pub mod crypto_primitives;

pub mod data_types;

pub mod parameters;
