//! Typed identifiers
//!
//! Items, users and backups are all keyed by UUID v4. Each gets its own
//! newtype so a `BackupId` can never be passed where an `ItemId` is expected.
//! `Display` prints a short prefixed form (`bak-550e8400`) for tables and
//! messages; the full UUID is what gets serialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                write!(f, "{}{}", $prefix, &simple[..8])
            }
        }

        /// Accepts a full UUID, optionally behind the display prefix
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Uuid::parse_str(s.strip_prefix($prefix).unwrap_or(s)).map(Self)
            }
        }
    };
}

typed_id!(
    /// Inventory item key, preserved across backup and restore
    ItemId,
    "itm-"
);
typed_id!(UserId, "usr-");
typed_id!(
    /// Backup metadata row key
    BackupId,
    "bak-"
);
