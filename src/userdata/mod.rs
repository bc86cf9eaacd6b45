//! User-data script rendering
//!
//! A user-data template turns declarative inputs into an executable boot
//! script. Templates implement [`UserData`]; new script shapes (e.g. a
//! non-container bootstrap) plug in as additional implementors without
//! touching any dispatch.

pub mod container_fleet;
pub mod script;

pub use container_fleet::ContainerFleet;
pub use script::ScriptBuilder;

use crate::session::CredentialContext;
use crate::UserDataError;

/// A renderable user-data template
pub trait UserData {
    /// Render the boot script
    ///
    /// Pure and deterministic: no I/O, no shared state, and identical
    /// inputs yield byte-identical output. The returned string starts
    /// with a shebang and ends with exactly one `\n`, ready to be handed
    /// to the instance-provisioning API as the user-data payload.
    fn render(&self, credentials: &CredentialContext) -> Result<String, UserDataError>;
}
