//! Decodes Hades run saves and tallies the boons taken so far, per deity.
//!
//! The pipeline runs strictly forward: [`envelope`] reads the header and
//! compressed payload, [`luabins`] decodes the expanded bytes into a
//! [`value::Value`] tree, [`run_state`] projects the parts of interest,
//! [`classify`] turns trait records into [`classify::Trait`]s and [`tally`]
//! folds them into per-deity [`tally::Booncount`]s. [`core_api::Engine`]
//! drives all of it.

pub mod classify;
pub mod core_api;
pub mod envelope;
pub mod luabins;
pub mod reader;
pub mod run_state;
pub mod tally;
pub mod value;
