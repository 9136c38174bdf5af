pub mod domain;
pub mod ports;

pub use domain::{
    next_route, ParseEnumError, Route, Session, Ticket, TicketDraft, TicketId, TicketPriority,
    TicketStats, TicketStatus,
};
pub use ports::{Clock, KeyValueStore, PortError, PortResult};
