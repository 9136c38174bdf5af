//! crates/ticketflow_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These types are independent of any storage or serialization format.

use std::fmt;
use std::str::FromStr;

/// Represents the single locally persisted login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub token: String,
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// The stored form, e.g. `in_progress`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Returned when a string is not one of the enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TicketStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl FromStr for TicketPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a ticket. Millisecond-timestamp shaped, unique per collection.
pub type TicketId = u64;

/// Represents a single support ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
}

/// The validated contents of a ticket form, before an id is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
}

impl TicketDraft {
    pub fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
        }
    }
}

/// Ticket counts by status, derived fresh from a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl TicketStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        tickets.iter().fold(
            Self {
                total: tickets.len(),
                ..Self::default()
            },
            |mut stats, ticket| {
                match ticket.status {
                    TicketStatus::Open => stats.open += 1,
                    TicketStatus::InProgress => stats.in_progress += 1,
                    TicketStatus::Closed => stats.closed += 1,
                }
                stats
            },
        )
    }
}

//=========================================================================================
// Routing
//=========================================================================================

/// Identifies which screen is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    Dashboard,
    Tickets,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
            Self::Tickets => "/tickets",
        }
    }

    /// Unknown paths fall back to the landing screen.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/dashboard" => Self::Dashboard,
            "/tickets" => Self::Tickets,
            _ => Self::Landing,
        }
    }

    /// Whether the route requires an active session.
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard | Self::Tickets)
    }
}

/// The route guard: the effective route for `route` given the current session.
pub fn next_route(route: Route, session: Option<&Session>) -> Route {
    if route.is_protected() && session.is_none() {
        Route::Login
    } else {
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: TicketId, status: TicketStatus) -> Ticket {
        Ticket {
            id,
            title: format!("ticket {id}"),
            description: String::new(),
            status,
            priority: TicketPriority::Medium,
        }
    }

    #[test]
    fn status_parses_only_stored_names() {
        assert_eq!("in_progress".parse(), Ok(TicketStatus::InProgress));
        assert_eq!("closed".parse(), Ok(TicketStatus::Closed));
        assert!("In Progress".parse::<TicketStatus>().is_err());
        assert!("".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn priority_rejects_unknown_value() {
        let err = "urgent".parse::<TicketPriority>().unwrap_err();
        assert_eq!(err.kind, "priority");
        assert_eq!(err.value, "urgent");
    }

    #[test]
    fn stats_count_each_status() {
        let tickets = vec![
            ticket(1, TicketStatus::Open),
            ticket(2, TicketStatus::Open),
            ticket(3, TicketStatus::InProgress),
            ticket(4, TicketStatus::Closed),
        ];
        let stats = TicketStats::from_tickets(&tickets);
        assert_eq!(
            stats,
            TicketStats {
                total: 4,
                open: 2,
                in_progress: 1,
                closed: 1
            }
        );
        assert_eq!(TicketStats::from_tickets(&[]), TicketStats::default());
    }

    #[test]
    fn guard_redirects_protected_routes_without_session() {
        assert_eq!(next_route(Route::Dashboard, None), Route::Login);
        assert_eq!(next_route(Route::Tickets, None), Route::Login);
        assert_eq!(next_route(Route::Landing, None), Route::Landing);
        assert_eq!(next_route(Route::Signup, None), Route::Signup);
    }

    #[test]
    fn guard_keeps_protected_routes_with_session() {
        let session = Session {
            email: "a@b.com".to_string(),
            token: "t".to_string(),
        };
        assert_eq!(next_route(Route::Dashboard, Some(&session)), Route::Dashboard);
        assert_eq!(next_route(Route::Tickets, Some(&session)), Route::Tickets);
    }

    #[test]
    fn route_paths_round_trip_and_unknown_is_landing() {
        for route in [
            Route::Landing,
            Route::Login,
            Route::Signup,
            Route::Dashboard,
            Route::Tickets,
        ] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/nowhere"), Route::Landing);
    }
}
