//! Notes report: authenticate, list recently active tickets, fetch each
//! ticket's notes, keep the notes created inside the window.

use tracing::{debug, info};

use super::failures::{Failure, FailureSink};
use super::pagination::collect_numbered_pages;
use super::window::{parse_timestamp, TimeWindow};
use crate::api::{ApiError, Credentials, ServiceDeskApi};
use crate::types::{FilteredNoteRecord, Note, TicketSummary};

const TICKETS_RESOURCE: &str = "tickets";

/// Page through the ticket search for tickets active since the window start
pub async fn fetch_ticket_list<A>(
    api: &A,
    window: &TimeWindow,
    page_size: u32,
    failures: &mut dyn FailureSink,
) -> Vec<TicketSummary>
where
    A: ServiceDeskApi + ?Sized,
{
    let from = window.start();
    let tickets = collect_numbered_pages(
        TICKETS_RESOURCE,
        page_size,
        |page_number| api.search_tickets(from, page_number, page_size),
        failures,
    )
    .await;
    info!("Fetched {} tickets active since {}", tickets.len(), from);
    tickets
}

/// Keep the notes of one ticket created inside the window
pub fn filter_notes(
    ticket: &TicketSummary,
    notes: Vec<Note>,
    window: &TimeWindow,
    failures: &mut dyn FailureSink,
) -> Vec<FilteredNoteRecord> {
    let mut kept = Vec::new();
    for mut note in notes {
        let Some(raw) = note.created_on.take() else {
            failures.record(Failure::TimestampParse {
                ticket_id: ticket.id,
                raw: String::new(),
                message: "createdOn is missing".to_string(),
            });
            continue;
        };

        match parse_timestamp(&raw) {
            Ok(created_on) if window.contains(created_on) => {
                kept.push(FilteredNoteRecord::new(ticket, note, raw));
            }
            Ok(_) => {}
            Err(e) => failures.record(Failure::TimestampParse {
                ticket_id: ticket.id,
                raw,
                message: e.to_string(),
            }),
        }
    }
    kept
}

/// Fetch notes ticket by ticket; a failed ticket is skipped, not fatal
pub async fn fetch_notes_per_ticket<A>(
    api: &A,
    tickets: &[TicketSummary],
    window: &TimeWindow,
    failures: &mut dyn FailureSink,
) -> Vec<FilteredNoteRecord>
where
    A: ServiceDeskApi + ?Sized,
{
    let mut records = Vec::new();
    for ticket in tickets {
        match api.ticket_notes(ticket.id).await {
            Ok(notes) => {
                let kept = filter_notes(ticket, notes, window, failures);
                debug!(ticket_id = ticket.id, kept = kept.len(), "filtered notes");
                records.extend(kept);
            }
            Err(error) => failures.record(Failure::DetailFetch {
                ticket_id: ticket.id,
                error,
            }),
        }
    }
    records
}

/// Run the whole notes pipeline; only authentication failure is an error
pub async fn run_notes_report<A>(
    api: &mut A,
    credentials: &Credentials,
    window: &TimeWindow,
    page_size: u32,
    failures: &mut dyn FailureSink,
) -> Result<Vec<FilteredNoteRecord>, ApiError>
where
    A: ServiceDeskApi + ?Sized,
{
    api.authenticate(credentials)
        .await
        .map_err(ApiError::into_auth_failure)?;
    info!("Authentication successful.");

    let tickets = fetch_ticket_list(&*api, window, page_size, failures).await;
    let records = fetch_notes_per_ticket(&*api, &tickets, window, failures).await;
    info!(
        "Kept {} notes from {} tickets created since {}",
        records.len(),
        tickets.len(),
        window.start()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::types::TicketId;

    /// In-memory ticketing backend that records every call
    #[derive(Default)]
    struct FakeServiceDesk {
        accept_login: bool,
        tickets: Vec<TicketSummary>,
        notes: HashMap<TicketId, Result<Vec<Note>, ApiError>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeServiceDesk {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ServiceDeskApi for FakeServiceDesk {
        async fn authenticate(&mut self, _credentials: &Credentials) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push("authenticate".to_string());
            if self.accept_login {
                Ok(())
            } else {
                Err(ApiError::AuthenticationFailed {
                    provider: "fake".to_string(),
                    message: "nope".to_string(),
                })
            }
        }

        async fn search_tickets(
            &self,
            _from: DateTime<Utc>,
            page_number: u32,
            page_size: u32,
        ) -> Result<Vec<TicketSummary>, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("search:{page_number}"));
            Ok(self
                .tickets
                .iter()
                .skip((page_number as usize - 1) * page_size as usize)
                .take(page_size as usize)
                .cloned()
                .collect())
        }

        async fn ticket_notes(&self, ticket_id: TicketId) -> Result<Vec<Note>, ApiError> {
            self.calls.lock().unwrap().push(format!("notes:{ticket_id}"));
            self.notes
                .get(&ticket_id)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn ticket(id: TicketId) -> TicketSummary {
        TicketSummary {
            id,
            ticket_number: format!("T{id}"),
            assignee_name: "Dana".to_string(),
            queue_name: "Support".to_string(),
            account_name: "Acme".to_string(),
        }
    }

    fn note(ticket_id: TicketId, details: &str, created_on: Option<&str>) -> Note {
        Note {
            ticket_id,
            details: details.to_string(),
            created_by_name: "Sam".to_string(),
            created_on: created_on.map(ToString::to_string),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "jdoe".to_string(),
            password: "secret".to_string(),
            tenant: "Acme".to_string(),
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::starting_at(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_filter_notes_boundary() {
        let mut failures = Vec::new();
        let notes = vec![
            note(1, "before", Some("2024-05-01T09:59:59Z")),
            note(1, "at", Some("2024-05-01T10:00:00Z")),
            note(1, "after", Some("2024-05-01T10:00:01Z")),
        ];

        let kept = filter_notes(&ticket(1), notes, &window(), &mut failures);

        let details: Vec<&str> = kept.iter().map(|r| r.details.as_str()).collect();
        assert_eq!(details, vec!["at", "after"]);
        assert!(failures.is_empty());
    }

    #[test]
    fn test_filter_notes_skips_bad_timestamps_only() {
        let mut failures = Vec::new();
        let notes = vec![
            note(4, "garbled", Some("last tuesday")),
            note(4, "missing", None),
            note(4, "good", Some("2024-05-02T08:00:00+02:00")),
        ];

        let kept = filter_notes(&ticket(4), notes, &window(), &mut failures);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].details, "good");
        assert_eq!(kept[0].created_on, "2024-05-02T08:00:00+02:00");
        assert_eq!(kept[0].ticket_number, "T4");
        assert_eq!(failures.len(), 2);
        assert!(matches!(
            &failures[0],
            Failure::TimestampParse { ticket_id: 4, raw, .. } if raw == "last tuesday"
        ));
    }

    #[tokio::test]
    async fn test_authentication_failure_stops_everything() {
        let mut api = FakeServiceDesk {
            accept_login: false,
            tickets: vec![ticket(1)],
            ..FakeServiceDesk::default()
        };
        let mut failures = Vec::new();

        let result = run_notes_report(&mut api, &credentials(), &window(), 100, &mut failures).await;

        assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
        assert_eq!(api.calls(), vec!["authenticate"]);
    }

    #[tokio::test]
    async fn test_failed_ticket_does_not_halt_later_tickets() {
        let mut notes = HashMap::new();
        notes.insert(1, Ok(vec![note(1, "first", Some("2024-05-03T00:00:00Z"))]));
        notes.insert(2, Err(ApiError::http("fake", 500, "boom")));
        notes.insert(3, Ok(vec![note(3, "third", Some("2024-05-04T00:00:00Z"))]));

        let mut api = FakeServiceDesk {
            accept_login: true,
            tickets: vec![ticket(1), ticket(2), ticket(3)],
            notes,
            ..FakeServiceDesk::default()
        };
        let mut failures = Vec::new();

        let records = run_notes_report(&mut api, &credentials(), &window(), 100, &mut failures)
            .await
            .unwrap();

        let ids: Vec<TicketId> = records.iter().map(|r| r.ticket_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], Failure::DetailFetch { ticket_id: 2, .. }));
        assert_eq!(
            api.calls(),
            vec!["authenticate", "search:1", "notes:1", "notes:2", "notes:3"]
        );
    }

    #[tokio::test]
    async fn test_ticket_list_pages_until_short_page() {
        let api = FakeServiceDesk {
            accept_login: true,
            tickets: (1..=250).map(ticket).collect(),
            ..FakeServiceDesk::default()
        };
        let mut failures = Vec::new();

        let tickets = fetch_ticket_list(&api, &window(), 100, &mut failures).await;

        assert_eq!(tickets.len(), 250);
        assert_eq!(tickets[0].id, 1);
        assert_eq!(tickets[249].id, 250);
        assert_eq!(api.calls(), vec!["search:1", "search:2", "search:3"]);
    }

    #[tokio::test]
    async fn test_no_tickets_yields_no_rows() {
        let mut api = FakeServiceDesk {
            accept_login: true,
            ..FakeServiceDesk::default()
        };
        let mut failures = Vec::new();

        let records = run_notes_report(&mut api, &credentials(), &window(), 100, &mut failures)
            .await
            .unwrap();

        assert!(records.is_empty());
        assert!(failures.is_empty());
        assert_eq!(api.calls(), vec!["authenticate", "search:1"]);
    }
}
