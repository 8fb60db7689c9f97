use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{PostKind, RawDayRow, StudentActivity};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let course_id = "course-v1:Demo+FR101+2026";
    let posts = vec![
        (
            "seed-thread-001",
            "CommentThread",
            None,
            "amori",
            2026,
            3,
            2,
            4,
            5,
            1,
        ),
        (
            "seed-thread-002",
            "CommentThread",
            None,
            "lchen",
            2026,
            3,
            4,
            2,
            2,
            0,
        ),
        (
            "seed-response-001",
            "Comment",
            None,
            "dkumar",
            2026,
            3,
            2,
            3,
            3,
            0,
        ),
        (
            "seed-response-002",
            "Comment",
            None,
            "amori",
            2026,
            3,
            5,
            0,
            1,
            1,
        ),
        (
            "seed-comment-001",
            "Comment",
            Some("seed-response-001"),
            "lchen",
            2026,
            3,
            3,
            1,
            1,
            0,
        ),
        (
            "seed-comment-002",
            "Comment",
            Some("seed-response-002"),
            "dkumar",
            2026,
            3,
            5,
            -1,
            0,
            1,
        ),
    ];

    let mut inserted = 0usize;
    for (source_key, record_type, parent_id, author, year, month, day, points, up, down) in posts {
        let result = sqlx::query(
            r#"
            INSERT INTO forum_reports.posts
            (id, course_id, record_type, parent_id, author_username,
             posted_year, posted_month, posted_day,
             vote_points, up_votes, down_votes, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(course_id)
        .bind(record_type)
        .bind(parent_id)
        .bind(author)
        .bind(year)
        .bind(month)
        .bind(day)
        .bind(points)
        .bind(up)
        .bind(down)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[derive(serde::Deserialize)]
struct ImportRow {
    course_id: String,
    record_type: Option<String>,
    parent_id: Option<String>,
    author_username: String,
    posted_year: Option<i32>,
    posted_month: Option<i32>,
    posted_day: Option<i32>,
    #[serde(default)]
    vote_points: i32,
    #[serde(default)]
    up_votes: i32,
    #[serde(default)]
    down_votes: i32,
    source_key: Option<String>,
}

async fn insert_post(pool: &PgPool, row: ImportRow) -> anyhow::Result<bool> {
    let source_key = row
        .source_key
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

    let result = sqlx::query(
        r#"
        INSERT INTO forum_reports.posts
        (id, course_id, record_type, parent_id, author_username,
         posted_year, posted_month, posted_day,
         vote_points, up_votes, down_votes, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&row.course_id)
    .bind(&row.record_type)
    .bind(&row.parent_id)
    .bind(&row.author_username)
    .bind(row.posted_year)
    .bind(row.posted_month)
    .bind(row.posted_day)
    .bind(row.vote_points)
    .bind(row.up_votes)
    .bind(row.down_votes)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<ImportRow>() {
        let row = result?;
        if insert_post(pool, row).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn import_jsonl(pool: &PgPool, jsonl_path: &std::path::Path) -> anyhow::Result<usize> {
    let content = std::fs::read_to_string(jsonl_path)
        .with_context(|| format!("failed to open {}", jsonl_path.display()))?;
    let mut inserted = 0usize;

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: ImportRow = serde_json::from_str(line)
            .with_context(|| format!("malformed record on line {}", number + 1))?;
        if insert_post(pool, row).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn fetch_daily_activity(
    pool: &PgPool,
    course_id: &str,
    kind: PostKind,
) -> anyhow::Result<Vec<RawDayRow>> {
    let mut query = String::from(
        "SELECT record_type AS kind, \
         posted_year AS year, posted_month AS month, posted_day AS day, \
         COUNT(*) AS posts, \
         COALESCE(SUM(vote_points), 0) AS net_points, \
         COALESCE(SUM(up_votes), 0) AS up_votes, \
         COALESCE(SUM(down_votes), 0) AS down_votes \
         FROM forum_reports.posts \
         WHERE course_id = $1",
    );

    match kind {
        PostKind::Thread => query.push_str(" AND record_type = 'CommentThread'"),
        PostKind::Response => {
            query.push_str(" AND record_type = 'Comment' AND parent_id IS NULL")
        }
        PostKind::Comment => {
            query.push_str(" AND record_type = 'Comment' AND parent_id IS NOT NULL")
        }
    }

    query.push_str(
        " GROUP BY record_type, posted_year, posted_month, posted_day \
         ORDER BY posted_year, posted_month, posted_day",
    );

    let records = sqlx::query(&query).bind(course_id).fetch_all(pool).await?;
    let mut rows = Vec::new();

    for row in records {
        rows.push(RawDayRow {
            kind: row.get("kind"),
            year: row.get("year"),
            month: row.get("month"),
            day: row.get("day"),
            posts: row.get("posts"),
            net_points: row.get("net_points"),
            up_votes: row.get("up_votes"),
            down_votes: row.get("down_votes"),
        });
    }

    Ok(rows)
}

pub async fn fetch_student_activity(
    pool: &PgPool,
    course_id: &str,
) -> anyhow::Result<Vec<StudentActivity>> {
    let records = sqlx::query(
        "SELECT author_username, \
         COUNT(*) AS posts, \
         COALESCE(SUM(vote_points), 0) AS votes \
         FROM forum_reports.posts \
         WHERE course_id = $1 \
         GROUP BY author_username \
         ORDER BY author_username",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    let mut students = Vec::new();
    for row in records {
        students.push(StudentActivity {
            username: row.get("author_username"),
            posts: row.get("posts"),
            votes: row.get("votes"),
        });
    }

    Ok(students)
}
