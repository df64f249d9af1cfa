// Google Sheets infra layer.
// - `service_account_auth.rs` turns a service-account key into access tokens.
// - `credential_resolvers.rs` finds the key (JSON file or inline env pair).
// - `sheets_client.rs` talks to the Sheets v4 values API.

#[path = "service_account_auth.rs"]
pub mod service_account_auth;

#[path = "credential_resolvers.rs"]
pub mod credential_resolvers;

#[path = "sheets_client.rs"]
pub mod sheets_client;

pub use credential_resolvers::{FileCredentialResolver, InlineKeyResolver};
pub use sheets_client::ServiceAccountConnector;
