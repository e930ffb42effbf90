pub mod identity_client;
pub mod mailer_client;
pub mod mirror_client;
pub mod object_store_client;

pub use identity_client::HttpIdentityProvider;
pub use mailer_client::HttpMailer;
pub use mirror_client::{HttpProfileMirror, NoopProfileMirror};
pub use object_store_client::HttpObjectStore;
