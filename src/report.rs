use crate::models::{DayActivity, StudentActivity};

pub fn daily_activity_csv(records: &[DayActivity]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Date",
        "Activity Type",
        "Number of Posts",
        "Net Points",
        "Up Votes",
        "Down Votes",
    ])?;

    for record in records {
        writer.write_record([
            record.date.to_string(),
            record.kind.label().to_string(),
            record.posts.to_string(),
            record.net_points.to_string(),
            record.up_votes.to_string(),
            record.down_votes.to_string(),
        ])?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

pub fn student_forums_csv(records: &[StudentActivity]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Username", "Posts", "Votes"])?;

    for record in records {
        writer.write_record([
            record.username.clone(),
            record.posts.to_string(),
            record.votes.to_string(),
        ])?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostKind;
    use chrono::NaiveDate;

    #[test]
    fn daily_report_has_header_and_one_row_per_record() {
        let records = vec![
            DayActivity {
                kind: PostKind::Thread,
                date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                posts: 2,
                net_points: 4,
                up_votes: 5,
                down_votes: 1,
            },
            DayActivity {
                kind: PostKind::Comment,
                date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                posts: 1,
                net_points: 1,
                up_votes: 1,
                down_votes: 0,
            },
        ];

        let rendered = daily_activity_csv(&records).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Date,Activity Type,Number of Posts,Net Points,Up Votes,Down Votes"
        );
        assert_eq!(lines[1], "2026-03-02,Thread,2,4,5,1");
        assert_eq!(lines[2], "2026-03-03,Comment,1,1,1,0");
    }

    #[test]
    fn student_report_lists_username_posts_votes() {
        let records = vec![StudentActivity {
            username: "amori".to_string(),
            posts: 3,
            votes: 4,
        }];

        let rendered = student_forums_csv(&records).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["Username,Posts,Votes", "amori,3,4"]);
    }
}
