//! Google Calendar busy-window source.
//!
//! Reads today's events from the primary calendar with a caller-supplied
//! OAuth access token. Token acquisition and refresh live elsewhere.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use url::Url;

use super::{BusyInterval, BusySource};
use crate::error::CalendarError;

/// Default Google Calendar API base URL.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Environment variable holding the Google access token.
pub const TOKEN_ENV: &str = "STUDYPLAN_GOOGLE_TOKEN";

const UNTITLED: &str = "(No Title)";

/// Busy source backed by the Google Calendar events API.
pub struct GoogleCalendarSource {
    client: Client,
    api_base: String,
    access_token: Option<String>,
}

impl GoogleCalendarSource {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            access_token,
        }
    }

    /// Token from [`TOKEN_ENV`]; an empty value counts as missing.
    pub fn from_env() -> Self {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        Self::new(token)
    }

    /// Point the client at a different API base (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn events_url(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&format!("{}/calendars/primary/events", self.api_base))?;
        url.query_pairs_mut()
            .append_pair("timeMin", &day_start.to_rfc3339())
            .append_pair("timeMax", &day_end.to_rfc3339())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");
        Ok(url)
    }
}

impl BusySource for GoogleCalendarSource {
    async fn fetch_busy(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| CalendarError::NotAuthenticated {
                service: "google".to_string(),
            })?;

        let url = self.events_url(day_start, day_end)?;
        tracing::debug!(%url, "fetching google calendar events");

        let resp = self.client.get(url).bearer_auth(token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status.as_u16() == 403 {
                tracing::warn!("google calendar returned 403; check the Calendar API is enabled for this account");
            }
            return Err(CalendarError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let events = parse_events(&body)?;
        tracing::info!(count = events.len(), "google calendar events loaded");
        Ok(events)
    }
}

/// Convert an events-list response body into busy intervals.
///
/// A body without `items` yields an empty list. Timed events use
/// `dateTime`; all-day events use `date` and map to UTC midnight.
pub fn parse_events(body: &serde_json::Value) -> Result<Vec<BusyInterval>, CalendarError> {
    if let Some(err) = body.get("error") {
        return Err(CalendarError::Malformed(format!("API error payload: {err}")));
    }

    let Some(items) = body.get("items").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .map(|item| {
            let title = item["summary"].as_str().unwrap_or(UNTITLED);
            let start = parse_event_time(&item["start"], "start")?;
            let end = parse_event_time(&item["end"], "end")?;
            Ok(BusyInterval::new(start, end).with_title(title))
        })
        .collect()
}

fn parse_event_time(value: &serde_json::Value, field: &str) -> Result<DateTime<Utc>, CalendarError> {
    if let Some(s) = value["dateTime"].as_str() {
        return DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CalendarError::Malformed(format!("invalid {field} dateTime: {s}")));
    }

    let s = value["date"]
        .as_str()
        .ok_or_else(|| CalendarError::Malformed(format!("missing {field} time")))?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| CalendarError::Malformed(format!("invalid {field} date: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_timed_and_all_day_events() {
        let body = json!({
            "items": [
                {
                    "summary": "Lecture",
                    "start": {"dateTime": "2026-10-16T09:00:00+02:00"},
                    "end": {"dateTime": "2026-10-16T10:30:00+02:00"}
                },
                {
                    "start": {"date": "2026-10-16"},
                    "end": {"date": "2026-10-17"}
                }
            ]
        });

        let events = parse_events(&body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title.as_deref(), Some("Lecture"));
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap());
        assert_eq!(events[0].duration_minutes(), 90);
        assert_eq!(events[1].title.as_deref(), Some("(No Title)"));
        assert_eq!(events[1].duration_minutes(), 24 * 60);
    }

    #[test]
    fn missing_items_is_empty() {
        assert!(parse_events(&json!({"kind": "calendar#events"})).unwrap().is_empty());
    }

    #[test]
    fn error_payload_is_rejected() {
        let body = json!({"error": {"code": 401, "message": "Invalid Credentials"}});
        assert!(parse_events(&body).is_err());
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let body = json!({
            "items": [{"start": {"dateTime": "yesterday"}, "end": {"dateTime": "today"}}]
        });
        assert!(matches!(parse_events(&body), Err(CalendarError::Malformed(_))));
    }

    #[test]
    fn events_url_carries_query() {
        let source = GoogleCalendarSource::new(None).with_api_base("http://localhost:1234/");
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap();
        let url = source.events_url(start, start + chrono::Duration::hours(24)).unwrap();

        assert_eq!(url.path(), "/calendars/primary/events");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("singleEvents".to_string(), "true".to_string())));
        assert!(pairs.contains(&("orderBy".to_string(), "startTime".to_string())));
        assert!(pairs.iter().any(|(k, _)| k == "timeMin"));
    }
}
