pub mod chain;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod oracle;
pub mod scheduler;
pub mod state;
pub mod sync;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use config::Config;
pub use error::SyncError;
pub use models::{Campaign, CampaignStatus, IngestedTransaction, ProcessStatus, SellProgress};
pub use state::AppState;
