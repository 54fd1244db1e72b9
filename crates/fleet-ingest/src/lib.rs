//! `fleet-ingest`: delivers agent location reports to the ingestion
//! service.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`sink`]     | `LocationSink` trait (the scheduler's delivery seam)        |
//! | [`outcome`]  | `Outcome` (`Delivered` / `DeliveryFailed`)                  |
//! | [`http`]     | `HttpIngestClient` (JSON POST via `reqwest`)                |
//! | [`error`]    | `IngestError`, `IngestResult<T>`                            |
//!
//! Delivery never returns an error: every transport failure, timeout, or
//! non-2xx status is folded into [`Outcome::DeliveryFailed`] so one bad
//! report cannot disturb the rest of a tick.  `IngestError` covers only
//! client construction.

pub mod error;
pub mod http;
pub mod outcome;
pub mod sink;


pub use error::{IngestError, IngestResult};
pub use http::HttpIngestClient;
pub use outcome::Outcome;
pub use sink::LocationSink;
