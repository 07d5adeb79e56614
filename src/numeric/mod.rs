// ============================================================================
// Numeric Module
// Dimension algebra and dimensioned scalar types
// ============================================================================
//
// This module provides:
// - DimensionVector: integer exponents of the five base dimensions
// - StaticDimValue<D>: dimension fixed in the type, checked by the compiler
// - DynDimValue: dimension carried at runtime, checked per operation
// - Dimensioned: conversion boundary used by the numeric engines
// - QuantityError: every failure the crate can report
//
// Design principles:
// - Exponents are integers; a root that would make them fractional is an error
// - Runtime checks return Result (no panics)
// - Magnitudes are always SI base units in f64

mod dimension;
mod dimensioned;
mod dynamic_dim;
mod errors;
mod static_dim;

pub use dimension::DimensionVector;
pub use dimensioned::Dimensioned;
pub(crate) use dimensioned::MagnitudeFn;
pub use dynamic_dim::DynDimValue;
pub use errors::{QuantityError, QuantityResult};
pub use static_dim::{
    Acceleration, Area, Charge, Current, Dimension, Dimensionless, Dims, Energy, Force, Frequency,
    Length, Mass, Powi, Power, Product, Quotient, Root, StaticDimValue, Temperature, Time,
    Velocity, Volume,
};
