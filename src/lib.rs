//! Core library for the parking-consolidator command line application.
//!
//! The library merges the employee assignment workbook with the master
//! parking table into one normalized record set and computes the zone,
//! ownership and plate-origin aggregates. Spreadsheet adapters live under
//! [`parking::consolidator::io`], the data representations inside
//! [`parking::consolidator::model`], text folding in
//! [`parking::consolidator::normalize`], the alignment logic in
//! [`parking::consolidator::merge`], and the run orchestration under
//! [`parking::consolidator::consolidate`].

pub mod parking;

pub use parking::consolidator::{
    ConsolidationError, Result, consolidate, error, flatten, io, merge, model, normalize, quality,
    registry, summary, zone,
};
