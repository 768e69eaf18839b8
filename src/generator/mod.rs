//! Template mail generation.
//!
//! A request names (or implies) a handler, supplies parameter values and
//! optional overrides. The generator:
//!
//! 1. types the values, using the handler's declared schema for nulls
//! 2. resolves the handler and checks the parameter contract
//! 3. selects every enabled template registered to the handler
//! 4. renders each template copy field by field and overlays overrides
//! 5. gives the message a fresh identity and queues it inside its own
//!    write scope
//!
//! Templates are processed one at a time. A failure on one template stops
//! the request but does not undo messages already queued.

mod error;
mod options;
mod pipeline;

pub use error::{GenerationError, GenerationResult};
pub use options::GenerateOptions;
pub use pipeline::EmailGenerator;
