//! Database entities.

pub mod comment;
pub mod comment_reaction;
pub mod forum;
pub mod group;
pub mod group_member;
pub mod notification;
pub mod opinion;
pub mod opinion_reaction;
pub mod poll;
pub mod poll_option;
pub mod reaction;
pub mod report;
pub mod thread;
pub mod user;
pub mod user_profile;
pub mod vote;

pub use comment::Entity as Comment;
pub use comment_reaction::Entity as CommentReaction;
pub use forum::Entity as Forum;
pub use group::Entity as Group;
pub use group_member::Entity as GroupMember;
pub use notification::Entity as Notification;
pub use opinion::Entity as Opinion;
pub use opinion_reaction::Entity as OpinionReaction;
pub use poll::Entity as Poll;
pub use poll_option::Entity as PollOption;
pub use reaction::ReactionKind;
pub use report::Entity as Report;
pub use thread::Entity as Thread;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
pub use vote::Entity as Vote;
