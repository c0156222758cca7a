//! Business logic services.

#![allow(missing_docs)]

pub mod analytics;
pub mod comment;
pub mod forum;
pub mod group;
pub mod moderation;
pub mod notification;
pub mod opinion;
pub mod poll;
pub mod reaction;
pub mod search;
pub mod user;

pub use analytics::{
    AnalyticsService, AnalyticsSummary, OptionPerformance, PollPerformance, TrendPoint,
    UserActivity,
};
pub use comment::{CommentService, CommentView, CreateCommentInput, UpdateCommentInput};
pub use forum::{
    CreateForumInput, CreateThreadInput, ForumService, UpdateThreadInput,
};
pub use group::{CreateGroupInput, GroupService, UpdateGroupInput};
pub use moderation::{CreateReportInput, ModerationService, ResolveReportInput};
pub use notification::NotificationService;
pub use opinion::{CreateOpinionInput, OpinionService, OpinionView, UpdateOpinionInput};
pub use poll::{
    CreatePollInput, OptionResult, PollOptionInput, PollResults, PollService, PollView,
    UpdatePollInput,
};
pub use reaction::{ReactionTransition, next_reaction_state};
pub use search::{SearchResults, SearchService};
pub use user::{
    ChangePasswordInput, LoginInput, RegisterInput, Session, UpdateProfileInput, UserService,
};
