//! services/app/src/ui/shell.rs
//!
//! This is the main control loop of the terminal front end. It reads one
//! command per line, dispatches it to the controller, and redraws the current
//! screen. Notification timers feed back into the same loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::auth::{validate_credentials, AuthMode};
use super::controller::Controller;
use super::form::FormErrors;
use super::protocol::Command;
use super::render::{render, HELP};
use super::tickets::{TicketError, DELETE_PROMPT, NO_FORM};
use super::toast::{Expired, Notification, Toaster};
use crate::error::AppError;
use ticketflow_core::domain::{Route, TicketId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Screen-local state layered over the controller.
pub struct Shell {
    controller: Controller,
    toaster: Toaster,
    auth_errors: FormErrors,
    pending_delete: Option<TicketId>,
    show_help: bool,
}

impl Shell {
    pub fn new(controller: Controller) -> (Self, mpsc::UnboundedReceiver<Expired>) {
        let (toaster, expired) = Toaster::new(controller.config().toast_duration);
        let shell = Self {
            controller,
            toaster,
            auth_errors: FormErrors::new(),
            pending_delete: None,
            show_help: false,
        };
        (shell, expired)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.toaster.current()
    }

    pub fn auth_errors(&self) -> &FormErrors {
        &self.auth_errors
    }

    pub fn pending_delete(&self) -> Option<TicketId> {
        self.pending_delete
    }

    fn notify(&mut self, notification: Option<Notification>) {
        if let Some(notification) = notification {
            self.toaster.show(notification);
        }
    }

    /// Applies a notification timer event. Returns whether a redraw is needed.
    pub fn expire(&mut self, event: Expired) -> bool {
        self.toaster.expire(event)
    }

    /// The full text of the current screen.
    pub fn screen(&self) -> String {
        let mut out = render(&self.controller, &self.auth_errors, self.toaster.current());
        if self.show_help {
            out.push('\n');
            out.push_str(HELP);
            out.push('\n');
        }
        if self.pending_delete.is_some() {
            out.push('\n');
            out.push_str(DELETE_PROMPT);
            out.push_str(" [y/N]\n");
        }
        out
    }

    /// Handles one input line.
    ///
    /// Must be called from within a tokio runtime, since a notification may
    /// start its timer.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        self.show_help = false;

        if let Some(id) = self.pending_delete.take() {
            let answer = line.trim().to_lowercase();
            let confirmed = answer == "y" || answer == "yes";
            let notice = self.controller.delete_ticket(id, |_| confirmed);
            self.notify(notice);
            return Flow::Continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                self.notify(Some(Notification::error(e.to_string())));
                return Flow::Continue;
            }
        };

        let before = self.controller.route();
        let flow = self.dispatch(command);
        let after = self.controller.route();
        if before != after {
            // Screen-local state does not survive a screen change.
            if !matches!(after, Route::Login | Route::Signup) {
                self.auth_errors.clear();
            }
            if before == Route::Tickets {
                self.controller.tickets_mut().cancel();
            }
            info!(from = before.path(), to = after.path(), "Route changed");
        }
        flow
    }

    fn dispatch(&mut self, command: Command) -> Flow {
        match command {
            Command::Navigate(route) => {
                self.toaster.dismiss();
                self.auth_errors.clear();
                let notice = self.controller.navigate(route);
                self.notify(notice);
            }
            Command::Login { email, password } => self.sign_in(AuthMode::Login, &email, &password),
            Command::Signup { email, password } => {
                self.sign_in(AuthMode::Signup, &email, &password)
            }
            Command::Logout => {
                self.toaster.dismiss();
                self.controller.logout();
            }
            Command::Dismiss => self.toaster.dismiss(),
            Command::Refresh => {}
            Command::Help => self.show_help = true,
            Command::Quit => return Flow::Quit,
            ticket_command => self.ticket_command(ticket_command),
        }
        Flow::Continue
    }

    fn sign_in(&mut self, mode: AuthMode, email: &str, password: &str) {
        let screen = match mode {
            AuthMode::Login => Route::Login,
            AuthMode::Signup => Route::Signup,
        };
        self.auth_errors = validate_credentials(email, password);
        if !self.auth_errors.is_empty() {
            if self.controller.route() != screen {
                self.toaster.dismiss();
                self.controller.navigate(screen);
            }
            return;
        }
        let result = match mode {
            AuthMode::Login => self.controller.login(email, password),
            AuthMode::Signup => self.controller.signup(email, password),
        };
        match result {
            Ok(notice) => {
                self.toaster.dismiss();
                self.notify(notice);
            }
            Err(e) => {
                warn!(?mode, "Sign-in rejected: {}", e);
                self.notify(Some(Notification::error(e.to_string())));
            }
        }
    }

    fn ticket_command(&mut self, command: Command) {
        if self.controller.route() != Route::Tickets {
            self.notify(Some(Notification::error(
                "Open the ticket screen first (tickets)",
            )));
            return;
        }
        let manager = self.controller.tickets_mut();
        match command {
            Command::NewTicket => manager.open_new(),
            Command::Edit(id) => {
                if let Err(e) = manager.begin_edit(id) {
                    self.notify(Some(Notification::error(e.to_string())));
                }
            }
            Command::Delete(id) => {
                if manager.get(id).is_some() {
                    self.pending_delete = Some(id);
                } else {
                    let e = TicketError::NotFound(id);
                    self.notify(Some(Notification::error(e.to_string())));
                }
            }
            Command::Submit => {
                let notice = self.controller.submit_ticket();
                self.notify(notice);
            }
            Command::Cancel => manager.cancel(),
            field_command => {
                let Some(form) = manager.form_mut() else {
                    self.notify(Some(Notification::error(NO_FORM)));
                    return;
                };
                match field_command {
                    Command::SetTitle(value) => form.title = value,
                    Command::SetDescription(value) => form.description = value,
                    Command::SetStatus(value) => form.status = value,
                    Command::SetPriority(value) => form.priority = value,
                    _ => {}
                }
            }
        }
    }
}

/// Runs the read-dispatch-render loop until `quit` or end of input.
pub async fn run<R, W>(
    mut shell: Shell,
    mut expired: mpsc::UnboundedReceiver<Expired>,
    input: R,
    mut output: W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write_screen(&mut output, &shell).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed, shutting down");
                    break;
                };
                if shell.handle_line(&line) == Flow::Quit {
                    info!("Quit requested");
                    break;
                }
            }
            Some(event) = expired.recv() => {
                if !shell.expire(event) {
                    continue;
                }
            }
        }
        write_screen(&mut output, &shell).await?;
    }
    Ok(())
}

async fn write_screen<W>(output: &mut W, shell: &Shell) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(b"\n").await?;
    output.write_all(shell.screen().as_bytes()).await?;
    output.write_all(b"> ").await?;
    output.flush().await?;
    Ok(())
}
