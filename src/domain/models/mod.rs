mod conversation;
mod model_catalog;
mod model_descriptor;
mod session;
mod turn;

pub use conversation::*;
pub use model_catalog::*;
pub use model_descriptor::*;
pub use session::*;
pub use turn::*;
