//! Client side of coursefind.
//!
//! This crate provides the backend client, the search controller with its
//! result cache wiring, view rendering, geolocation reporting, and the chat
//! assistant session.

pub mod api;
pub mod chat;
pub mod controller;
pub mod location;
pub mod render;

pub use api::{ApiError, HttpConfig, HttpTransport, SearchClient, SearchPayload, Transport, endpoint_for};
pub use chat::{ChatMessage, ChatReply, ChatSession, HISTORY_LIMIT, Role};
pub use controller::{Outcome, Phase, SearchController, Surface};
pub use location::{FixedPosition, GeoProvider, GeolocationError, LocationReporter, LocationStatus, Position};
pub use render::{View, render};
