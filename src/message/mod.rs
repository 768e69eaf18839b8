//! Generated email messages and caller overrides

mod overrides;
mod types;

pub use overrides::MessageOverrides;
pub use types::EmailMessage;
