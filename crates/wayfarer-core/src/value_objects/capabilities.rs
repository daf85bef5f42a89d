//! Capability flags granted by an account role
//!
//! Capabilities are never stored; they are derived from [`Role`](crate::entities::Role)
//! and consulted by [`AccessPolicy`](crate::rules::AccessPolicy).

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// What an actor may do to resources they do not own
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Soft-delete any post
        const DELETE_ANY_POST         = 1 << 0;
        /// Soft-delete any comment
        const DELETE_ANY_COMMENT      = 1 << 1;
        /// Answer join requests on plans owned by someone else
        const MANAGE_TRAVEL_REQUESTS  = 1 << 2;
        /// List join requests on plans owned by someone else
        const VIEW_ANY_TRAVEL_REQUESTS = 1 << 3;

        /// Everything a moderator may do
        const MODERATOR = Self::DELETE_ANY_POST.bits()
            | Self::DELETE_ANY_COMMENT.bits();

        const ALL = Self::DELETE_ANY_POST.bits()
            | Self::DELETE_ANY_COMMENT.bits()
            | Self::MANAGE_TRAVEL_REQUESTS.bits()
            | Self::VIEW_ANY_TRAVEL_REQUESTS.bits();
    }
}

impl Capabilities {
    /// Names of the individual flags that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.list().join("|"))
    }
}
