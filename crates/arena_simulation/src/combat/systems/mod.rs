//! Combat systems (attack start, impact resolution)

pub mod attack;
pub mod impact;


pub use attack::*;
pub use impact::*;
