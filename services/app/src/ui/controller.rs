//! services/app/src/ui/controller.rs
//!
//! The root controller. It owns the current route, the session and the
//! canonical ticket manager, and re-applies the route guard after every
//! transition.

use std::sync::Arc;
use ticketflow_core::domain::{next_route, Route, Session, TicketId, TicketStats};
use tracing::{error, info, warn};

use super::auth::{authenticate, AuthError, AuthMode};
use super::state::AppState;
use super::tickets::{DeleteOutcome, Submitted, TicketError, TicketManager};
use super::toast::Notification;

pub struct Controller {
    state: Arc<AppState>,
    route: Route,
    session: Option<Session>,
    tickets: TicketManager,
}

impl Controller {
    /// Restores the persisted session and ticket collection and starts on
    /// the landing route.
    pub fn start(state: Arc<AppState>) -> Self {
        let session = state.sessions.load().unwrap_or_else(|e| {
            error!("Failed to read session, starting signed out: {:?}", e);
            None
        });
        let mut tickets = TicketManager::new(state.tickets.clone(), state.clock.clone());
        if let Err(e) = tickets.load() {
            error!("Failed to read tickets: {:?}", e);
        }
        info!(signed_in = session.is_some(), "Controller started");
        Self {
            state,
            route: Route::Landing,
            session,
            tickets,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn tickets(&self) -> &TicketManager {
        &self.tickets
    }

    pub fn tickets_mut(&mut self) -> &mut TicketManager {
        &mut self.tickets
    }

    /// Counts derived from the current collection.
    pub fn stats(&self) -> TicketStats {
        TicketStats::from_tickets(self.tickets.tickets())
    }

    pub fn config(&self) -> &crate::config::Config {
        &self.state.config
    }

    fn apply_guard(&mut self) {
        let effective = next_route(self.route, self.session.as_ref());
        if effective != self.route {
            warn!(
                from = self.route.path(),
                to = effective.path(),
                "Redirecting unauthenticated user"
            );
            self.route = effective;
        }
    }

    /// Selects a route, then lets the guard have the final say.
    ///
    /// Entering the dashboard or ticket screen re-reads the stored tickets.
    pub fn navigate(&mut self, route: Route) -> Option<Notification> {
        self.route = route;
        self.apply_guard();
        if !self.route.is_protected() {
            return None;
        }
        match self.tickets.load() {
            Ok(()) => None,
            Err(e) => {
                error!("Failed to load tickets: {:?}", e);
                Some(Notification::error("Failed to load tickets"))
            }
        }
    }

    /// On success returns any notice raised while entering the dashboard.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Option<Notification>, AuthError> {
        self.sign_in(AuthMode::Login, email, password)
    }

    /// Signup never checks whether the email was used before.
    pub fn signup(&mut self, email: &str, password: &str) -> Result<Option<Notification>, AuthError> {
        self.sign_in(AuthMode::Signup, email, password)
    }

    fn sign_in(
        &mut self,
        mode: AuthMode,
        email: &str,
        password: &str,
    ) -> Result<Option<Notification>, AuthError> {
        let session = authenticate(mode, email, password)?;
        self.state.sessions.save(&session)?;
        info!(email = %session.email, ?mode, "Signed in");
        self.session = Some(session);
        Ok(self.navigate(Route::Dashboard))
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.state.sessions.clear() {
            error!("Failed to clear stored session: {:?}", e);
        }
        if let Some(session) = self.session.take() {
            info!(email = %session.email, "Signed out");
        }
        self.tickets.cancel();
        self.route = Route::Landing;
        self.apply_guard();
    }

    /// Submits the open ticket form and maps the result to a notification.
    ///
    /// Validation failures return `None`; their messages live on the form.
    pub fn submit_ticket(&mut self) -> Option<Notification> {
        match self.tickets.submit() {
            Ok(Submitted::Created(_)) => Some(Notification::success("Ticket created successfully")),
            Ok(Submitted::Updated(_)) => Some(Notification::success("Ticket updated successfully")),
            Err(TicketError::Invalid(_)) => None,
            Err(e) => {
                error!("Ticket submission failed: {}", e);
                Some(Notification::error(e.to_string()))
            }
        }
    }

    pub fn delete_ticket<F>(&mut self, id: TicketId, confirm: F) -> Option<Notification>
    where
        F: FnOnce(&str) -> bool,
    {
        match self.tickets.delete(id, confirm) {
            Ok(DeleteOutcome::Deleted) => Some(Notification::success("Ticket deleted successfully")),
            Ok(DeleteOutcome::Declined) => None,
            Ok(DeleteOutcome::Missing) => {
                warn!(ticket_id = id, "Delete requested for unknown ticket");
                None
            }
            Err(e) => {
                error!("Ticket deletion failed: {}", e);
                Some(Notification::error(e.to_string()))
            }
        }
    }
}
