//! Strongly typed identifier wrappers.
//!
//! Patients get a zero-cost integer handle allocated by the roster.  Areas and
//! patient types are named by the collaborator that authors the facility, so
//! their ids wrap a `String` and borrow as `&str` for map lookups.

use std::borrow::Borrow;
use std::fmt;

/// Reserved routing source: the edge a patient type enters the facility by.
pub const ENTRY: &str = "ENTRY";

/// Reserved routing target: selecting an edge to it discharges the patient.
pub const EXIT: &str = "EXIT";

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The handle that follows `self` in allocation order.
            #[inline(always)]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

/// Generate a typed ID wrapper around an owned name.
macro_rules! named_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
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

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id! {
    /// Stable roster handle of a patient.  Allocated sequentially, so
    /// ascending order is admission order.
    pub struct PatientId(u32);
}

named_id! {
    /// Identifier of an area (service station) in the facility graph.
    pub struct AreaId;
}

named_id! {
    /// Identifier of a patient archetype in the catalog.
    pub struct PatientTypeId;
}

impl AreaId {
    /// `true` for the reserved `ENTRY` routing source.
    #[inline]
    pub fn is_entry(&self) -> bool {
        self.0 == ENTRY
    }

    /// `true` for the reserved `EXIT` routing target.
    #[inline]
    pub fn is_exit(&self) -> bool {
        self.0 == EXIT
    }

    /// `true` for either routing sentinel.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.is_entry() || self.is_exit()
    }
}
