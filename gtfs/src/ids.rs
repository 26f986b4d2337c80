use std::fmt;

use serde::{Deserialize, Serialize};

// GTFS IDs are opaque strings. Wrap them so a trip can't be looked up with a stop ID.
macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new<S: Into<String>>(x: S) -> Self {
                Self(x.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(StopID);
string_id!(OpsLocationID);
string_id!(TripID);
string_id!(DeadheadID);
string_id!(RouteID);
string_id!(BlockID);
string_id!(ServiceID);

impl BlockID {
    /// Feeds sometimes pad block IDs. Surrounding whitespace is dropped, and a blank ID means no
    /// block.
    pub(crate) fn cleanup(id: Option<BlockID>) -> Option<BlockID> {
        let id = id?;
        let trimmed = id.0.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.len() == id.0.len() {
            return Some(id);
        }
        Some(BlockID::new(trimmed))
    }
}
