//! Easing curves and tween values.

pub mod ease;
pub mod value;
