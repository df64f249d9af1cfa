// Bonus listing core - reads the bonus table from a spreadsheet.
//
// The service owns the lifecycle of the spreadsheet client. Connecting can
// fail (missing or broken credentials), so the client is modelled as a small
// state machine:
//
//   Uninitialized --connect ok--> Ready      (kept for the process lifetime)
//   Uninitialized --connect err-> Failed
//   Failed        --connect ok--> Ready
//   Failed        --connect err-> Failed     (retried on the next call)

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use super::bonus_models::{map_rows, BonusRecord, BONUS_RANGE};

// ============================================================================
// ERRORS
// ============================================================================

/// Errors raised while serving bonuses. None of them are retried.
#[derive(Debug, Error)]
pub enum BonusError {
    /// A required setting is absent.
    #[error("Google Sheets is not configured: {0}")]
    Configuration(String),
    /// Credential material is present but could not be used.
    #[error("Google Sheets authentication failed: {0}")]
    Authentication(String),
    /// The upstream read failed or returned something unexpected.
    #[error("Failed to read bonuses from Google Sheets: {0}")]
    Integration(String),
}

// ============================================================================
// PORTS
// ============================================================================

/// An authenticated, read-only view of spreadsheets.
#[async_trait]
pub trait SheetReader: Send + Sync {
    /// Reads the cell values of `range`. A range with no data yields no rows.
    async fn read_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<Value>>, BonusError>;
}

/// Builds a [`SheetReader`], resolving whatever credentials it needs.
#[async_trait]
pub trait SheetsConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn SheetReader>, BonusError>;
}

// Lets the service hold any connector chosen at runtime.
#[async_trait]
impl SheetsConnector for Box<dyn SheetsConnector> {
    async fn connect(&self) -> Result<Arc<dyn SheetReader>, BonusError> {
        (**self).connect().await
    }
}

// ============================================================================
// SERVICE
// ============================================================================

enum ClientState {
    Uninitialized,
    Ready(Arc<dyn SheetReader>),
    Failed(String),
}

pub struct BonusService<C: SheetsConnector> {
    connector: C,
    spreadsheet_id: String,
    state: Mutex<ClientState>,
}

impl<C: SheetsConnector> BonusService<C> {
    pub fn new(connector: C, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            connector,
            spreadsheet_id: spreadsheet_id.into(),
            state: Mutex::new(ClientState::Uninitialized),
        }
    }

    /// Connects now instead of on the first read. A no-op once connected.
    pub async fn initialize(&self) -> Result<(), BonusError> {
        self.client().await.map(|_| ())
    }

    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.lock().await, ClientState::Ready(_))
    }

    /// Reads the bonus table and maps it to records, in sheet order.
    ///
    /// Connects first if no client is ready yet; a failed connection is
    /// attempted again on the next call.
    pub async fn get_bonuses(&self) -> Result<Vec<BonusRecord>, BonusError> {
        let reader = self.client().await?;

        let rows = reader
            .read_values(&self.spreadsheet_id, BONUS_RANGE)
            .await?;
        let bonuses = map_rows(&rows);

        tracing::debug!(
            rows = rows.len(),
            bonuses = bonuses.len(),
            "Read bonus table"
        );

        Ok(bonuses)
    }

    async fn client(&self) -> Result<Arc<dyn SheetReader>, BonusError> {
        // Held across connect so concurrent first requests make one attempt.
        let mut state = self.state.lock().await;

        match &*state {
            ClientState::Ready(reader) => return Ok(Arc::clone(reader)),
            ClientState::Failed(reason) => {
                tracing::info!(previous_error = %reason, "Retrying Google Sheets initialization");
            }
            ClientState::Uninitialized => {}
        }

        match self.connector.connect().await {
            Ok(reader) => {
                tracing::info!("Google Sheets client initialized");
                *state = ClientState::Ready(Arc::clone(&reader));
                Ok(reader)
            }
            Err(e) => {
                *state = ClientState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
