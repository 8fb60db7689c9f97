use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{DayActivity, PostKind, RawDayRow};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("aggregate row is missing its {0}")]
    MissingField(&'static str),
    #[error("aggregate row tagged {tag:?} cannot belong to the {kind} stream")]
    KindMismatch { kind: PostKind, tag: String },
    #[error("no such calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: i32, day: i32 },
    #[error("out-of-order {kind} record for {date} after {previous}")]
    OutOfOrder {
        kind: PostKind,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

// End sorts above every real date, so an exhausted stream never wins the
// three-way comparison in merge_daily_activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Day(NaiveDate),
    End,
}

pub struct StreamCursor<'a> {
    records: &'a [DayActivity],
    pos: usize,
}

impl<'a> StreamCursor<'a> {
    pub fn new(records: &'a [DayActivity]) -> Self {
        Self { records, pos: 0 }
    }

    pub fn peek(&self) -> DateKey {
        self.records
            .get(self.pos)
            .map_or(DateKey::End, |record| DateKey::Day(record.date))
    }

    pub fn current(&self) -> Option<&'a DayActivity> {
        self.records.get(self.pos)
    }

    pub fn advance(&mut self) {
        debug_assert!(self.pos < self.records.len(), "advance past exhausted stream");
        if self.pos < self.records.len() {
            self.pos += 1;
        }
    }
}

pub fn typed_stream(kind: PostKind, rows: &[RawDayRow]) -> Result<Vec<DayActivity>, MergeError> {
    rows.iter().map(|row| typed_record(kind, row)).collect()
}

fn typed_record(kind: PostKind, row: &RawDayRow) -> Result<DayActivity, MergeError> {
    let tag = row
        .kind
        .as_deref()
        .ok_or(MergeError::MissingField("kind tag"))?;
    if !kind.matches_tag(tag) {
        return Err(MergeError::KindMismatch {
            kind,
            tag: tag.to_string(),
        });
    }

    let year = row.year.ok_or(MergeError::MissingField("year"))?;
    let month = row.month.ok_or(MergeError::MissingField("month"))?;
    let day = row.day.ok_or(MergeError::MissingField("day"))?;
    let date = match (u32::try_from(month), u32::try_from(day)) {
        (Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(year, m, d),
        _ => None,
    }
    .ok_or(MergeError::InvalidDate { year, month, day })?;

    Ok(DayActivity {
        kind,
        date,
        posts: row.posts,
        net_points: row.net_points,
        up_votes: row.up_votes,
        down_votes: row.down_votes,
    })
}

pub fn merge_daily_activity(
    threads: &[DayActivity],
    responses: &[DayActivity],
    comments: &[DayActivity],
) -> Result<Vec<DayActivity>, MergeError> {
    let mut thread_cursor = StreamCursor::new(threads);
    let mut response_cursor = StreamCursor::new(responses);
    let mut comment_cursor = StreamCursor::new(comments);

    let mut merged = Vec::with_capacity(threads.len() + responses.len() + comments.len());
    let mut last_date: Option<NaiveDate> = None;

    loop {
        let thread_date = thread_cursor.peek();
        let response_date = response_cursor.peek();
        let comment_date = comment_cursor.peek();

        // Ties resolve Thread, then Response, then Comment.
        let selected = if thread_date <= response_date && thread_date <= comment_date {
            &mut thread_cursor
        } else if response_date <= thread_date && response_date <= comment_date {
            &mut response_cursor
        } else {
            &mut comment_cursor
        };

        let Some(record) = selected.current() else {
            break;
        };
        if let Some(previous) = last_date {
            if record.date < previous {
                return Err(MergeError::OutOfOrder {
                    kind: record.kind,
                    date: record.date,
                    previous,
                });
            }
        }
        last_date = Some(record.date);
        merged.push(record.clone());
        selected.advance();
    }

    Ok(merged)
}
