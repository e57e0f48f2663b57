/*!
 * Request extractors
 *
 * - identity: the auth pipeline attaches an IdentityContext to every request
 *   it lets through; handlers read it through CurrentPrincipal
 * - JSON bodies: deserialization and shape failures become AppError
 */

mod json;
mod principal;

pub use json::{Validate, ValidJson};
pub use principal::CurrentPrincipal;
