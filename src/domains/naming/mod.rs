//! Naming domain module.
//!
//! Maps a (service, operation) pair onto the single flat identifier an MCP
//! client uses to address a tool, and back again.
//!
//! ## Architecture
//!
//! - `codec.rs` - Encoding/decoding schemes and the tool-name side table
//! - `error.rs` - Naming error types
//!
//! Two schemes are supported. `Lossless` joins both halves with a separator
//! that can never appear in a service name, so decoding is an exact inverse.
//! `Flattened` targets clients that only accept `^[A-Za-z0-9_-]{1,64}$` and
//! lower-cases the service name; the original pair is recovered from a side
//! table recorded when the name was produced.

mod codec;
mod error;

pub use codec::{
    CLIENT_PREFIX_MARKER, FLATTENED_SEPARATOR, NamingScheme, SERVICE_NAME_MAX_LEN,
    TOOL_NAME_MAX_LEN, ToolAddress, ToolNameCodec, strip_client_prefix,
};
pub use error::NamingError;
