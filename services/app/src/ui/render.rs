//! services/app/src/ui/render.rs
//!
//! Text rendering of each screen. Rendering is a pure function of the
//! controller state plus the screen-local bits the shell keeps (auth form
//! errors and the current notification).

use std::fmt::Write;
use ticketflow_core::domain::{Route, Ticket};

use super::controller::Controller;
use super::form::{Field, FormErrors};
use super::toast::{Notification, NotificationKind};

const BRAND: &str = "TicketFlow";
const RULE: &str = "----------------------------------------";

pub const HELP: &str = "\
Navigation: home | login | signup | dashboard | tickets | go <path>
Account:    login <email> <password> | signup <email> <password> | logout
Tickets:    new | edit <id> | delete <id> | submit | cancel
Form:       title <text> | description <text> | status <open|in_progress|closed> | priority <low|medium|high>
Other:      dismiss | help | quit";

pub fn render(controller: &Controller, auth_errors: &FormErrors, toast: Option<&Notification>) -> String {
    let mut out = String::new();
    if let Some(toast) = toast {
        render_toast(&mut out, toast);
    }
    match controller.route() {
        Route::Landing => render_landing(&mut out),
        Route::Login => render_auth(&mut out, Route::Login, auth_errors),
        Route::Signup => render_auth(&mut out, Route::Signup, auth_errors),
        Route::Dashboard => render_dashboard(&mut out, controller),
        Route::Tickets => render_tickets(&mut out, controller),
    }
    out
}

fn render_toast(out: &mut String, toast: &Notification) {
    let tag = match toast.kind {
        NotificationKind::Success => "OK",
        NotificationKind::Error => "ERROR",
    };
    let _ = writeln!(out, "[{}] {}  (dismiss)", tag, toast.message);
}

fn field_error(out: &mut String, errors: &FormErrors, field: Field) {
    if let Some(message) = errors.get(&field) {
        let _ = writeln!(out, "    ! {}", message);
    }
}

fn render_landing(out: &mut String) {
    let _ = writeln!(out, "{}", BRAND);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Manage your support tickets with ease.");
    let _ = writeln!(out, "Track, prioritize and resolve issues in one place.");
    let _ = writeln!(out);
    let _ = writeln!(out, "  login   - sign in to your account");
    let _ = writeln!(out, "  signup  - get started");
}

fn render_auth(out: &mut String, mode: Route, errors: &FormErrors) {
    let (heading, verb, other, other_prompt) = if mode == Route::Login {
        ("Welcome Back", "login", "signup", "Don't have an account?")
    } else {
        ("Create Account", "signup", "login", "Already have an account?")
    };
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  {} <email> <password>", verb);
    field_error(out, errors, Field::Email);
    field_error(out, errors, Field::Password);
    let _ = writeln!(out);
    let _ = writeln!(out, "{} Type '{}'.", other_prompt, other);
}

fn render_header(out: &mut String, controller: &Controller, title: &str) {
    let email = controller.session().map(|s| s.email.as_str()).unwrap_or("");
    let _ = writeln!(out, "{}  |  {}  |  logout", BRAND, email);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out);
}

fn render_dashboard(out: &mut String, controller: &Controller) {
    render_header(out, controller, "Dashboard");
    let stats = controller.stats();
    for (label, value) in [
        ("Total Tickets", stats.total),
        ("Open", stats.open),
        ("In Progress", stats.in_progress),
        ("Closed", stats.closed),
    ] {
        let _ = writeln!(out, "  {:>4}  {}", value, label);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Quick Actions: tickets - Manage Tickets");
}

fn render_tickets(out: &mut String, controller: &Controller) {
    render_header(out, controller, "Ticket Management");
    let manager = controller.tickets();

    if let Some(editor) = manager.editor() {
        let verb = if editor.editing.is_some() { "Edit" } else { "Create" };
        let _ = writeln!(out, "{} Ticket", verb);
        let form = &editor.form;
        let _ = writeln!(out, "  Title *      : {}", form.title);
        field_error(out, &editor.errors, Field::Title);
        let _ = writeln!(out, "  Description  : {}", form.description);
        let _ = writeln!(out, "  Status *     : {}", form.status);
        field_error(out, &editor.errors, Field::Status);
        let _ = writeln!(out, "  Priority     : {}", form.priority);
        field_error(out, &editor.errors, Field::Priority);
        let _ = writeln!(out, "  submit to {} | cancel", verb.to_lowercase());
        let _ = writeln!(out);
    }

    let tickets = manager.tickets();
    if tickets.is_empty() {
        let _ = writeln!(out, "No tickets yet");
        let _ = writeln!(out, "Create your first ticket to get started. (new)");
        return;
    }
    for ticket in tickets {
        render_ticket(out, ticket);
    }
}

fn render_ticket(out: &mut String, ticket: &Ticket) {
    let description = if ticket.description.is_empty() {
        "No description"
    } else {
        ticket.description.as_str()
    };
    let _ = writeln!(out, "#{}  {}", ticket.id, ticket.title);
    let _ = writeln!(out, "    {}", description);
    let _ = writeln!(out, "    [{}] [{}]", ticket.status.label(), ticket.priority.label());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketflow_core::domain::{TicketPriority, TicketStatus};

    #[test]
    fn ticket_shows_labels_and_missing_description() {
        let ticket = Ticket {
            id: 1,
            title: "t".to_string(),
            description: String::new(),
            status: TicketStatus::InProgress,
            priority: TicketPriority::High,
        };
        let mut out = String::new();
        render_ticket(&mut out, &ticket);
        assert!(out.contains("No description"));
        assert!(out.contains("[In Progress] [High]"));
    }

    #[test]
    fn auth_screen_lists_field_errors() {
        let mut errors = FormErrors::new();
        errors.insert(Field::Email, "Invalid email format".to_string());
        let mut out = String::new();
        render_auth(&mut out, Route::Login, &errors);
        assert!(out.contains("Welcome Back"));
        assert!(out.contains("! Invalid email format"));
        assert!(out.contains("Type 'signup'"));
    }

    #[test]
    fn toast_is_tagged_by_kind() {
        let mut out = String::new();
        render_toast(&mut out, &Notification::error("Invalid input. Please check your details."));
        assert!(out.starts_with("[ERROR] Invalid input."));
    }
}
