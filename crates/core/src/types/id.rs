//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use food_express_core::define_id;
/// define_id!(CustomerId);
/// define_id!(OrderId);
///
/// let customer_id = CustomerId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(CustomerId);
define_id!(RestaurantId);
define_id!(MenuItemId);
define_id!(CartId);
define_id!(CartLineId);
define_id!(OrderId);
define_id!(AgentId);

impl CartLineId {
    /// The ID of a line that has not been persisted yet.
    ///
    /// The backend assigns line IDs; until the first round trip a new line
    /// carries this placeholder.
    pub const UNASSIGNED: Self = Self(0);

    /// Whether the backend has assigned this line an ID yet.
    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        self.0 == 0
    }

    /// Serde default for lines arriving without an ID.
    #[must_use]
    pub const fn unassigned() -> Self {
        Self::UNASSIGNED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = OrderId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(OrderId::from(42), id);
    }

    #[test]
    fn test_unassigned_line_id() {
        assert!(CartLineId::UNASSIGNED.is_unassigned());
        assert!(!CartLineId::new(7).is_unassigned());
        assert_eq!(CartLineId::default(), CartLineId::UNASSIGNED);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: CustomerId = serde_json::from_str("17").expect("deserialize");
        assert_eq!(id, CustomerId::new(17));
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "17");
    }
}
