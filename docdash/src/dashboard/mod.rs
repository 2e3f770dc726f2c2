//! View state and user-action handlers for the dashboard.
//!
//! [`Dashboard`] owns everything the views display: fetched snapshots, the
//! form inputs, the inline message banner and the server status badge.
//! Rendering lives in [`render`] and never touches the network.

mod confirm;
mod controller;
pub mod render;
mod state;

pub use confirm::{delete_prompt, AssumeYes, Confirm};
pub use controller::{Dashboard, FormState, NO_EXAMPLES, NO_SEARCH_RESULTS};
pub use state::{Action, Outcome, Phase, ServerStatus, Tone};
