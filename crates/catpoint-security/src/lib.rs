//! `catpoint-security` – Alarm decision engine.
//!
//! Decides the alarm state of a home-security system from arming commands,
//! sensor activations and camera-based cat detection.
//!
//! # Modules
//!
//! - [`service`] – [`SecurityService`][service::SecurityService]: the state
//!   machine. Every alarm change goes through it.
//! - [`repository`] – [`SecurityRepository`][repository::SecurityRepository]:
//!   the storage seam, with an in-memory implementation.
//! - [`listener`] – [`StatusListener`][listener::StatusListener]: observer
//!   callbacks and the identity-keyed [`ListenerSet`][listener::ListenerSet].

pub mod listener;
pub mod repository;
pub mod service;

pub use listener::{ListenerSet, StatusListener};
pub use repository::{InMemorySecurityRepository, SecurityRepository};
pub use service::{CAT_CONFIDENCE_THRESHOLD, SecurityService};
