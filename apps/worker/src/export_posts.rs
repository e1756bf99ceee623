use inkwell_application::{MAX_POSTS_PER_PAGE, QueuedJob};
use inkwell_core::AppResult;
use inkwell_domain::{Post, TaskProgress, UserId};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{WorkerServices, report_progress};

/// Queue name of the post export task.
pub const TASK_NAME: &str = "export_posts";

/// Notification carrying the finished export.
const RESULT_NOTIFICATION: &str = "exported_posts";

#[derive(Debug, Serialize)]
struct ExportedPost {
    id: i64,
    title: Option<String>,
    body: String,
    timestamp: String,
}

impl From<&Post> for ExportedPost {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            timestamp: post.created_at.to_rfc3339(),
        }
    }
}

/// Collects every post written by the job's user and hands it back as a
/// notification, reporting progress after each page.
pub async fn run(services: &WorkerServices, job: &QueuedJob) -> AppResult<()> {
    report_progress(services, job, TaskProgress::NOT_STARTED).await?;

    let mut exported = Vec::new();
    let mut scanned = 0_i64;
    let mut page_number = 1_u32;

    loop {
        let page = services
            .post_service
            .list_posts(page_number, Some(MAX_POSTS_PER_PAGE))
            .await?;

        scanned += i64::try_from(page.items.len()).unwrap_or(i64::MAX);
        exported.extend(authored_by(
            page.items.iter().map(|summary| &summary.post),
            job.user_id,
        ));

        if !page.has_next() {
            break;
        }

        // 100 is reported once the task completes.
        let progress = scan_progress(scanned, page.total).percent().min(99);
        let progress = TaskProgress::from_reported(Some(progress.into()));
        report_progress(services, job, progress).await?;
        page_number += 1;
    }

    info!(
        job_id = %job.id,
        user_id = %job.user_id,
        post_count = exported.len(),
        "posts exported"
    );

    services
        .notification_service
        .add_notification(
            job.user_id,
            RESULT_NOTIFICATION,
            &json!({
                "task_id": job.id.as_str(),
                "posts": exported,
            }),
        )
        .await?;

    Ok(())
}

fn authored_by<'a>(
    posts: impl Iterator<Item = &'a Post>,
    user_id: UserId,
) -> impl Iterator<Item = ExportedPost> {
    posts
        .filter(move |post| post.author_id == user_id)
        .map(ExportedPost::from)
}

fn scan_progress(scanned: i64, total: i64) -> TaskProgress {
    if total <= 0 {
        return TaskProgress::DONE;
    }

    TaskProgress::from_reported(Some(scanned.saturating_mul(100) / total))
}
