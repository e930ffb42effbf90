pub mod identity;
pub mod mailer;
pub mod mirror;
pub mod object_store;

pub use identity::{IdentityAccount, IdentityProvider, TokenClaims};
pub use mailer::Mailer;
pub use mirror::ProfileMirror;
pub use object_store::ObjectStore;
