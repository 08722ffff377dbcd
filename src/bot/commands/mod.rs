//! Discord command implementations for the back-office bot.

/// General commands - ping and help
pub mod general;
/// Sales and cleaning intake commands
pub mod intake;
/// Read-only weekly reporting commands
pub mod report;

pub use general::*;
pub use intake::*;
pub use report::*;
