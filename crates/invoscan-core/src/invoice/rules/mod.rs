//! Rule-based building blocks of field extraction: keyword anchoring,
//! spatial neighbor search and value validation.

pub mod keywords;
pub mod patterns;
pub mod spatial;
pub mod validate;

pub use keywords::{find_anchors, fold_case};
pub use patterns::*;
pub use spatial::{closest_below, closest_to_the_right, neighbors, Neighbors};
pub use validate::{extract_value, validate_candidates};
