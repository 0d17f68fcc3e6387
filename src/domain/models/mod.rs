mod filter;
mod notification;
mod post;

pub use filter::{Category, PostFilter, SortOrder, UsedFilter};
pub use notification::{Notification, NotificationKind};
pub use post::{
    ImageChange, NewImage, NewPostRecord, Post, PostChanges, PostDraft, PostEdit, PostView,
};
