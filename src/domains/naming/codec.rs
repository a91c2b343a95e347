//! Tool name codec.
//!
//! Encodes a (service, operation) pair into a tool identifier and decodes it
//! back, validating both directions against the active [`NamingScheme`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use super::error::NamingError;

/// Maximum length of a service name.
pub const SERVICE_NAME_MAX_LEN: usize = 64;

/// Maximum length of a tool name, whatever the scheme.
pub const TOOL_NAME_MAX_LEN: usize = 64;

/// Separator used by the flattened scheme.
pub const FLATTENED_SEPARATOR: char = '_';

/// Marker some MCP clients use to prepend their own namespace to tool names
/// (e.g. `mcp__bridge__greeter_hello`). Everything up to and including the
/// last occurrence is discarded before decoding.
pub const CLIENT_PREFIX_MARKER: &str = "__";

/// Default separator for the lossless scheme.
const DEFAULT_LOSSLESS_SEPARATOR: char = '.';

// ============================================================================
// Naming Scheme
// ============================================================================

/// How a (service, operation) pair is turned into a tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum NamingScheme {
    /// `service<sep>operation`, where `<sep>` can never occur in a service
    /// name. Decoding is an exact inverse.
    Lossless { separator: char },

    /// `lowercase(service)_operation`, restricted to `^[A-Za-z0-9_-]{1,64}$`.
    /// The original casing is only recoverable through the side table.
    Flattened,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self::Lossless {
            separator: DEFAULT_LOSSLESS_SEPARATOR,
        }
    }
}

impl NamingScheme {
    /// Create a lossless scheme with the given separator.
    ///
    /// The separator must be a printable ASCII character outside the service
    /// name alphabet (`[A-Za-z0-9-]`), otherwise decoding would be ambiguous.
    pub fn lossless(separator: char) -> Result<Self, NamingError> {
        if !separator.is_ascii_graphic() || is_service_char(separator) {
            return Err(NamingError::conflict(
                separator.to_string(),
                "lossless separator must be a printable ASCII character outside [A-Za-z0-9-]",
            ));
        }
        Ok(Self::Lossless { separator })
    }

    /// Parse a scheme from its configuration name (`lossless` or `flattened`).
    pub fn from_name(name: &str, separator: Option<char>) -> Result<Self, NamingError> {
        match name.trim().to_lowercase().as_str() {
            "lossless" => Self::lossless(separator.unwrap_or(DEFAULT_LOSSLESS_SEPARATOR)),
            "flattened" => Ok(Self::Flattened),
            other => Err(NamingError::conflict(
                other,
                "unknown naming scheme, expected 'lossless' or 'flattened'",
            )),
        }
    }

    /// The character placed between the service and the operation.
    pub fn separator(&self) -> char {
        match self {
            Self::Lossless { separator } => *separator,
            Self::Flattened => FLATTENED_SEPARATOR,
        }
    }

    /// Human-readable shape of a tool name, used in error messages.
    pub fn expected_format(&self) -> String {
        format!("service{}operation", self.separator())
    }

    fn is_tool_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == self.separator()
    }
}

fn is_service_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Collect the distinct characters of `value` rejected by `allowed`, in order
/// of first appearance.
fn offending_chars(value: &str, allowed: impl Fn(char) -> bool) -> Vec<char> {
    let mut found = Vec::new();
    for c in value.chars() {
        if !allowed(c) && !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

fn describe_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("{:?}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove a client-specific prefix (anything up to the last `__`).
pub fn strip_client_prefix(name: &str) -> &str {
    match name.rfind(CLIENT_PREFIX_MARKER) {
        Some(pos) => &name[pos + CLIENT_PREFIX_MARKER.len()..],
        None => name,
    }
}

// ============================================================================
// Tool Address
// ============================================================================

/// The (service, operation) pair a tool name refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolAddress {
    pub service: String,
    pub operation: String,
}

impl ToolAddress {
    pub fn new(service: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Encoder/decoder for tool names under a single [`NamingScheme`].
///
/// The side table maps produced tool names to the address they were built
/// from. It is written during setup (catalog registration, or when a gateway
/// learns the tool list) and read on every decode.
#[derive(Debug, Default)]
pub struct ToolNameCodec {
    scheme: NamingScheme,
    aliases: RwLock<HashMap<String, ToolAddress>>,
}

impl ToolNameCodec {
    /// Create a codec for the given scheme with an empty side table.
    pub fn new(scheme: NamingScheme) -> Self {
        Self {
            scheme,
            aliases: RwLock::new(HashMap::new()),
        }
    }

    /// The active naming scheme.
    pub fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    /// Check that `service` matches `^[A-Za-z0-9-]{1,64}$`.
    pub fn validate_service_name(&self, service: &str) -> Result<(), NamingError> {
        if service.is_empty() {
            return Err(NamingError::conflict(service, "service name must not be empty"));
        }
        let bad = offending_chars(service, is_service_char);
        if !bad.is_empty() {
            return Err(NamingError::conflict(
                service,
                format!(
                    "service name contains disallowed characters [{}]; only [A-Za-z0-9-] is allowed",
                    describe_chars(&bad)
                ),
            ));
        }
        if service.len() > SERVICE_NAME_MAX_LEN {
            return Err(NamingError::conflict(
                service,
                format!(
                    "service name is {} characters long, the maximum is {}",
                    service.len(),
                    SERVICE_NAME_MAX_LEN
                ),
            ));
        }
        Ok(())
    }

    /// Compose the tool name for `service` and `operation`.
    ///
    /// The composed name is re-validated against the scheme's tool name
    /// policy; it is never truncated.
    pub fn encode(&self, service: &str, operation: &str) -> Result<String, NamingError> {
        self.validate_service_name(service)?;
        if operation.is_empty() {
            return Err(NamingError::conflict(
                format!("{}{}", service, self.scheme.separator()),
                "operation name must not be empty",
            ));
        }

        let name = match self.scheme {
            NamingScheme::Lossless { separator } => format!("{}{}{}", service, separator, operation),
            NamingScheme::Flattened => {
                format!("{}{}{}", service.to_lowercase(), FLATTENED_SEPARATOR, operation)
            }
        };

        self.validate_tool_name(&name)?;
        Ok(name)
    }

    /// Check a composed tool name against the scheme's tool name policy.
    pub fn validate_tool_name(&self, name: &str) -> Result<(), NamingError> {
        let bad = offending_chars(name, |c| self.scheme.is_tool_char(c));
        if !bad.is_empty() {
            return Err(NamingError::conflict(
                name,
                format!(
                    "tool name contains disallowed characters [{}]",
                    describe_chars(&bad)
                ),
            ));
        }
        if name.len() > TOOL_NAME_MAX_LEN {
            return Err(NamingError::conflict(
                name,
                format!(
                    "tool name is {} characters long, the maximum is {}",
                    name.len(),
                    TOOL_NAME_MAX_LEN
                ),
            ));
        }
        if name.contains(CLIENT_PREFIX_MARKER) {
            return Err(NamingError::conflict(
                name,
                format!(
                    "tool name must not contain the client prefix marker '{}'",
                    CLIENT_PREFIX_MARKER
                ),
            ));
        }
        Ok(())
    }

    /// Record the address a tool name was produced from.
    pub fn remember(&self, tool_name: impl Into<String>, address: ToolAddress) {
        let mut aliases = self.aliases.write().unwrap_or_else(PoisonError::into_inner);
        aliases.insert(tool_name.into(), address);
    }

    /// Look up a tool name in the side table.
    pub fn resolve(&self, tool_name: &str) -> Option<ToolAddress> {
        let aliases = self.aliases.read().unwrap_or_else(PoisonError::into_inner);
        aliases.get(tool_name).cloned()
    }

    /// Whether a tool name is present in the side table.
    pub fn is_known(&self, tool_name: &str) -> bool {
        let aliases = self.aliases.read().unwrap_or_else(PoisonError::into_inner);
        aliases.contains_key(tool_name)
    }

    /// Number of entries in the side table.
    pub fn known_len(&self) -> usize {
        self.aliases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Split a client-supplied name on the first separator, after stripping
    /// any client prefix. No side-table lookup is performed.
    pub fn split(&self, name: &str) -> Result<ToolAddress, NamingError> {
        let stripped = strip_client_prefix(name);
        let separator = self.scheme.separator();

        let (service, operation) = stripped
            .split_once(separator)
            .ok_or_else(|| NamingError::invalid_tool_name(name, self.scheme.expected_format()))?;

        if service.is_empty() || operation.is_empty() {
            return Err(NamingError::invalid_tool_name(
                name,
                self.scheme.expected_format(),
            ));
        }

        Ok(ToolAddress::new(service, operation))
    }

    /// Decode a client-supplied tool name into its address.
    ///
    /// Lossless names decode exactly. Flattened names are resolved through
    /// the side table; unknown flattened names fall back to the raw split,
    /// keeping the service exactly as it appears in the tool name.
    pub fn decode(&self, name: &str) -> Result<ToolAddress, NamingError> {
        let address = self.split(name)?;

        match self.scheme {
            NamingScheme::Lossless { .. } => Ok(address),
            NamingScheme::Flattened => {
                let stripped = strip_client_prefix(name);
                match self.resolve(stripped) {
                    Some(known) => Ok(known),
                    None => {
                        debug!(
                            "Tool name '{}' not in side table, using raw split {}/{}",
                            stripped, address.service, address.operation
                        );
                        Ok(address)
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
