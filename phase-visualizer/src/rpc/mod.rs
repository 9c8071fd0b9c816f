//! JSON-RPC 2.0 communication layer for web frontend integration.
//!
//! Bridges the visualizer's public API to a host page via iframe
//! postMessage, supporting both request-response and notification patterns.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Dispatch to visualizer
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <──────── stats_update (no ID) ───────┤
//! ```
//!
//! ## Methods
//!
//! - `go_to_phase`: `{"phase": "brain"}` or `{"index": 1}`
//! - `next_phase` / `previous_phase`: step through the phase order
//! - `toggle_auto_transition`: returns the new running state
//! - `destroy`: stop the loop and release resources
//! - `get_stats`: current phase, frame count, transition and auto state
//!
//! ## Notifications
//!
//! - `stats_update`: `{"fps": f32, "stats": {...}}` every half second
//!
//! ## Error Codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// JSON-RPC 2.0 bidirectional bridge and request dispatch.
pub mod web_rpc;
