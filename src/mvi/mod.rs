//! Model-View-Intent primitives shared by the state containers.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                               │
//!    └───────────────────────────────┘
//! ```
//!
//! - **State**: cloneable snapshot handed to subscribers
//! - **Intent**: something that happened (user action or fetch result)
//! - **Reducer**: pure `(State, Intent) -> State` transition

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::ViewState;
