//! Strongly typed string identifier wrappers.
//!
//! Entities and behaviors are addressed by human-readable names
//! (`"torus-pulse"`, `"bhv_torus_pulse_osc"`), so the ids wrap a `String`
//! rather than an index.  They are `Ord + Hash` so they can be used as map
//! keys, and `Borrow<str>` so maps keyed by them can be queried with `&str`.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed ID wrapper around a `String`.
macro_rules! named_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

named_id! {
    /// Unique identifier of an entity inside one `EntityManager`.
    pub struct EntityId;
}

named_id! {
    /// Identifier of a behavior registration inside one `BehaviorScheduler`.
    ///
    /// Either supplied by the behavior author or generated as `bhv_<token>`.
    pub struct BehaviorId;
}
