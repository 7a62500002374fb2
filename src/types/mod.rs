//! Data carried through the two reporting pipelines

pub mod asset;
pub mod ticket;

pub use asset::AssetRecord;
pub use ticket::{FilteredNoteRecord, Note, TicketId, TicketSummary};
