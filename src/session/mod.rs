//! Session state and the process-wide session store
//!
//! A session tracks one uploaded asset (or uploaded transcript) from
//! registration through transcription and analysis. All mutation goes
//! through [`SessionStore::update`], which merges a partial update and
//! notifies subscribers with the full new snapshot.

mod state;
mod store;

pub use state::{SessionState, SessionStatus, SessionUpdate};
pub use store::SessionStore;
