//! Lifecycle statuses for orders and delivery agents.
//!
//! The backend is not consistent about status spelling: the same state
//! arrives as `"OUT_FOR_DELIVERY"`, `"out for delivery"`, or with stray
//! whitespace depending on the endpoint. Every comparison in the client goes
//! through [`normalize_status`] so the partitioning logic sees one spelling.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalize a raw status string for comparison.
///
/// Trims surrounding whitespace, lowercases, and treats underscores as
/// spaces. This is the only status comparison rule in the system.
#[must_use]
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase().replace('_', " ")
}

/// Order lifecycle status, owned by the backend.
///
/// Clients never advance this locally except as transient optimistic UI
/// state; the next authoritative fetch overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Placed,
    OutForDelivery,
    Delivered,
    /// A status outside the known set, preserved verbatim.
    Unknown(String),
}

impl OrderStatus {
    /// Parse a raw status string using the normalization rule.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize_status(raw).as_str() {
            "placed" => Self::Placed,
            "out for delivery" => Self::OutForDelivery,
            "delivered" => Self::Delivered,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Placed => "placed",
            Self::OutForDelivery => "out for delivery",
            Self::Delivered => "delivered",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Delivery agent availability status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentStatus {
    Available,
    Busy,
    /// A status outside the known set, preserved verbatim.
    Unknown(String),
}

impl AgentStatus {
    /// Parse a raw status string using the normalization rule.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize_status(raw).as_str() {
            "available" => Self::Available,
            "busy" => Self::Busy,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AgentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
