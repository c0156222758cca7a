//! Repository layer over `sea-orm`.
//!
//! Each repository wraps an `Arc<DatabaseConnection>` and exposes async CRUD
//! and query helpers returning `AppResult`. Counter columns are mutated with
//! single-statement `update_many` expressions so they never race with reads.

pub mod comment;
pub mod forum;
pub mod group;
pub mod notification;
pub mod opinion;
pub mod poll;
pub mod report;
pub mod user;

pub use comment::{CommentReactionRepository, CommentRepository};
pub use forum::{ForumRepository, ThreadRepository};
pub use group::{GroupMemberRepository, GroupRepository};
pub use notification::NotificationRepository;
pub use opinion::{OpinionReactionRepository, OpinionRepository};
pub use poll::{PollListFilter, PollOptionRepository, PollRepository, PollSort, VoteRepository};
pub use report::ReportRepository;
pub use user::{UserProfileRepository, UserRepository};
