// Domain layer - Core pipeline types and rules

pub mod errors;
pub mod model;
pub mod rules;
