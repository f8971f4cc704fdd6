//! Types shared between the formgen server and its clients: the persisted
//! models, the request/response payloads of the HTTP API and the structural
//! validators for card templates and form schemas.

pub mod model;
pub mod requests;
pub mod responses;
pub mod schema;
