use std::sync::Arc;

use crate::core::bonuses::{BonusService, SheetsConnector};

pub type SharedBonusService = Arc<BonusService<Box<dyn SheetsConnector>>>;

/// Shared across every request. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub bonuses: SharedBonusService,
}

impl AppState {
    pub fn new(bonuses: SharedBonusService) -> Self {
        Self { bonuses }
    }
}
