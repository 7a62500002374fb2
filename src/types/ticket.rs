//! Ticket, note and exported note-row types

/// Ticket identifier assigned by the ticketing API
pub type TicketId = i64;

/// Ticket metadata returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub id: TicketId,
    pub ticket_number: String,
    pub assignee_name: String,
    pub queue_name: String,
    pub account_name: String,
}

/// A note attached to a ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub ticket_id: TicketId,
    pub details: String,
    pub created_by_name: String,
    /// Raw timestamp as sent by the API; may be absent or malformed
    pub created_on: Option<String>,
}

/// One exported row: a note joined with its parent ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredNoteRecord {
    pub ticket_id: TicketId,
    pub details: String,
    pub ticket_number: String,
    pub assignee_name: String,
    pub queue_name: String,
    pub account_name: String,
    pub created_by_name: String,
    pub created_on: String,
}

impl FilteredNoteRecord {
    /// Join a note with its parent ticket; `created_on` is kept verbatim
    pub fn new(ticket: &TicketSummary, note: Note, created_on: String) -> Self {
        Self {
            ticket_id: ticket.id,
            details: note.details,
            ticket_number: ticket.ticket_number.clone(),
            assignee_name: ticket.assignee_name.clone(),
            queue_name: ticket.queue_name.clone(),
            account_name: ticket.account_name.clone(),
            created_by_name: note.created_by_name,
            created_on,
        }
    }

    /// Field values in CSV column order
    pub fn csv_fields(&self) -> [String; 8] {
        [
            self.ticket_id.to_string(),
            self.details.clone(),
            self.ticket_number.clone(),
            self.assignee_name.clone(),
            self.queue_name.clone(),
            self.account_name.clone(),
            self.created_by_name.clone(),
            self.created_on.clone(),
        ]
    }
}
