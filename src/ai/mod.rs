mod extract;
mod prompt;
mod provider;

pub use extract::*;
pub use prompt::*;
pub use provider::*;
