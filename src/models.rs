use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Thread,
    Response,
    Comment,
}

impl PostKind {
    pub fn label(self) -> &'static str {
        match self {
            PostKind::Thread => "Thread",
            PostKind::Response => "Response",
            PostKind::Comment => "Comment",
        }
    }

    // Threads are stored as CommentThread records; responses and comments
    // are both stored as Comment records, split by parent presence.
    pub fn matches_tag(self, tag: &str) -> bool {
        match self {
            PostKind::Thread => tag == "CommentThread",
            PostKind::Response | PostKind::Comment => tag == "Comment",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayActivity {
    pub kind: PostKind,
    pub date: NaiveDate,
    pub posts: i64,
    pub net_points: i64,
    pub up_votes: i64,
    pub down_votes: i64,
}

#[derive(Debug, Clone)]
pub struct RawDayRow {
    pub kind: Option<String>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub posts: i64,
    pub net_points: i64,
    pub up_votes: i64,
    pub down_votes: i64,
}

#[derive(Debug, Clone)]
pub struct StudentActivity {
    pub username: String,
    pub posts: i64,
    pub votes: i64,
}
