pub mod aggregator;
pub mod auth;
pub mod closure;
mod convert;
pub mod error;
pub mod events;
pub mod groups;
pub mod interests;
pub mod lifecycle;
pub mod router;
pub mod state;
pub mod users;

#[cfg(test)]
mod testing;

pub use router::router;
pub use state::{AppState, AppStateInner};
