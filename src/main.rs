use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod db;
mod merge;
mod models;
mod report;

use models::PostKind;

#[derive(Parser)]
#[command(name = "forum-reports")]
#[command(about = "Forum activity report generator for online courses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import raw forum posts from an export file
    #[command(group(
        ArgGroup::new("format")
            .args(["csv", "jsonl"])
            .required(true)
            .multiple(false)
    ))]
    Import {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        jsonl: Option<PathBuf>,
    },
    /// Generate the daily forum activity CSV for a course
    Report {
        #[arg(long)]
        course: String,
        #[arg(long, default_value = "forum_activity.csv")]
        out: PathBuf,
    },
    /// Generate the per-student forum usage CSV for a course
    StudentReport {
        #[arg(long)]
        course: String,
        #[arg(long, default_value = "student_forums.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let inserted = db::seed(&pool).await?;
            println!("Inserted {inserted} seed posts.");
        }
        Commands::Import { csv, jsonl } => {
            let (inserted, source) = if let Some(path) = csv {
                (db::import_csv(&pool, &path).await?, path)
            } else if let Some(path) = jsonl {
                (db::import_jsonl(&pool, &path).await?, path)
            } else {
                unreachable!("clap enforces exactly one import format");
            };
            println!("Inserted {inserted} posts from {}.", source.display());
        }
        Commands::Report { course, out } => {
            let thread_rows = db::fetch_daily_activity(&pool, &course, PostKind::Thread).await?;
            let response_rows =
                db::fetch_daily_activity(&pool, &course, PostKind::Response).await?;
            let comment_rows = db::fetch_daily_activity(&pool, &course, PostKind::Comment).await?;

            let threads = merge::typed_stream(PostKind::Thread, &thread_rows)?;
            let responses = merge::typed_stream(PostKind::Response, &response_rows)?;
            let comments = merge::typed_stream(PostKind::Comment, &comment_rows)?;

            let merged = merge::merge_daily_activity(&threads, &responses, &comments)?;
            if merged.is_empty() {
                println!("No forum activity found for {course}.");
                return Ok(());
            }

            let rendered = report::daily_activity_csv(&merged)?;
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
        Commands::StudentReport { course, out } => {
            let students = db::fetch_student_activity(&pool, &course).await?;
            if students.is_empty() {
                println!("No forum activity found for {course}.");
                return Ok(());
            }

            let rendered = report::student_forums_csv(&students)?;
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
