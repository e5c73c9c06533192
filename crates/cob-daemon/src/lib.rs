//! cob-daemon library target.
//!
//! Exposes the routers, dispatcher wiring, transports and state for
//! integration tests. The binary `main.rs` depends on this library target.

pub mod api_types;
pub mod dispatch;
pub mod routes;
pub mod state;
pub mod transport;
pub mod updates;
