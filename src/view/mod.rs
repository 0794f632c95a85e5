//! View subsystem.
//!
//! # Data Flow
//! ```text
//! SessionState + AccountView + airdrop facts + notifications
//!     → model.rs (ViewModel, pure)
//!     → html.rs (page)  |  JSON (GET /api/state)
//! ```

pub mod format;
pub mod html;
pub mod model;

pub use format::{format_balance, format_sol, LOADING};
pub use html::render_page;
pub use model::{AirdropFacts, ViewModel};
