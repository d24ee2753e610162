use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, response::Html};
use chrono::{DateTime, Local, TimeZone};

/// GET /api/info handler - Contact count and server time as an HTML fragment
#[utoipa::path(
    get,
    path = routes::INFO,
    responses(
        (status = 200, description = "HTML fragment with the contact count and server time", body = String, content_type = "text/html"),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn info_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let count = state.store.count().await?;
    Ok(Html(render_info(count, &Local::now())))
}

/// Render the info fragment
///
/// The timestamp follows the layout of a browser's `Date.toString()` up to
/// the numeric offset and leaves out the trailing zone name, e.g.
/// `Mon Oct 19 2026 10:00:00 GMT+0000`.
pub fn render_info<Tz: TimeZone>(count: usize, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "<p>Phonebook has info for {} people</p>\n<p>{}</p>\n",
        count,
        now.format("%a %b %d %Y %H:%M:%S GMT%z")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_contact, failing_app, memory_app, send_raw};
    use axum::http::StatusCode;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_render_info_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        assert_eq!(
            render_info(4, &now),
            "<p>Phonebook has info for 4 people</p>\n<p>Mon Oct 19 2026 10:00:00 GMT+0000</p>\n"
        );
    }

    #[test]
    fn test_render_info_uses_numeric_offset_only() {
        let helsinki = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = helsinki.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap();
        assert!(render_info(0, &now).ends_with("<p>Mon Oct 19 2026 13:00:00 GMT+0300</p>\n"));
    }

    #[tokio::test]
    async fn test_info_reports_current_count() {
        let app = memory_app();
        create_contact(&app, "Ada", "12-345678").await;
        create_contact(&app, "Grace", "39-4453235").await;

        let (status, body) = send_raw(&app, "GET", "/api/info", None).await;
        assert_eq!(status, StatusCode::OK);

        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<p>Phonebook has info for 2 people</p>"), "{}", html);
        assert!(html.contains("GMT"), "{}", html);
    }

    #[tokio::test]
    async fn test_info_storage_failure_is_500() {
        let app = failing_app();
        let (status, _) = send_raw(&app, "GET", "/api/info", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
