pub mod bonus_models;
mod bonus_service;
pub mod credentials;

pub use bonus_models::BonusRecord;
pub use bonus_service::{BonusError, BonusService, SheetReader, SheetsConnector};
pub use credentials::{CredentialResolver, Resolution, ServiceAccountKey};
