//! Domain services containing core business logic.

mod prompt_composer;

pub use prompt_composer::*;
