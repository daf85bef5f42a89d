//! Pure interaction rules - decide what to change, never change it

mod policy;
mod thread;
mod toggle;

pub use policy::AccessPolicy;
pub use thread::{ReplyPreview, ThreadRules};
pub use toggle::{toggle_presence, EdgeMutation, FollowTransition, ToggleAction, VoteTransition};
