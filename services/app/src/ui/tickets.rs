//! services/app/src/ui/tickets.rs
//!
//! The ticket CRUD manager: the in-memory collection, the form being edited,
//! and the persist-on-every-mutation contract.
//!
//! A mutation is applied to a copy of the collection, the copy is written to
//! storage as one blob, and only then does it replace the in-memory list. A
//! failed write therefore leaves the previous collection in place.
//!
//! Stored records that cannot be decoded are carried along untouched and
//! written back with every save. If the stored blob is unreadable as a whole,
//! writes are refused until a later load succeeds, so the blob is never
//! replaced by a partial view of it.

use std::sync::Arc;
use ticketflow_core::domain::{Ticket, TicketDraft, TicketId, TicketPriority, TicketStatus};
use ticketflow_core::ports::{Clock, PortError, PortResult};
use tracing::{info, warn};

use super::form::{Field, FormErrors};
use crate::adapters::{TicketRepository, UnreadableRecord};

pub const TITLE_REQUIRED: &str = "Title is required";
pub const STATUS_INVALID: &str = "Status must be: open, in_progress, or closed";
pub const PRIORITY_INVALID: &str = "Priority must be: low, medium, or high";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this ticket?";
pub const NO_FORM: &str = "No ticket form is open (new or edit <id>)";

//=========================================================================================
// Form
//=========================================================================================

/// The raw values of the ticket form, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TicketStatus::Open.as_str().to_string(),
            priority: TicketPriority::Medium.as_str().to_string(),
        }
    }
}

impl TicketForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: status.into(),
            priority: priority.into(),
        }
    }

    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            status: ticket.status.as_str().to_string(),
            priority: ticket.priority.as_str().to_string(),
        }
    }

    /// Validates the form and, if valid, converts it to a typed draft.
    pub fn to_draft(&self) -> Result<TicketDraft, FormErrors> {
        let mut errors = FormErrors::new();
        if self.title.trim().is_empty() {
            errors.insert(Field::Title, TITLE_REQUIRED.to_string());
        }
        let status = self.status.parse::<TicketStatus>();
        if status.is_err() {
            errors.insert(Field::Status, STATUS_INVALID.to_string());
        }
        let priority = self.priority.parse::<TicketPriority>();
        if priority.is_err() {
            errors.insert(Field::Priority, PRIORITY_INVALID.to_string());
        }
        match (status, priority) {
            (Ok(status), Ok(priority)) if errors.is_empty() => Ok(TicketDraft {
                title: self.title.clone(),
                description: self.description.clone(),
                status,
                priority,
            }),
            _ => Err(errors),
        }
    }
}

/// Returns the field-keyed error messages for `form`; empty means valid.
pub fn validate(form: &TicketForm) -> FormErrors {
    form.to_draft().err().unwrap_or_default()
}

//=========================================================================================
// Errors and Outcomes
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Please fix the highlighted fields")]
    Invalid(FormErrors),
    #[error("Ticket {0} not found")]
    NotFound(TicketId),
    #[error("{}", NO_FORM)]
    NoForm,
    #[error("No ticket ids are left above {0}")]
    IdsExhausted(TicketId),
    #[error("Failed to save tickets: {0}")]
    Storage(#[from] PortError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt.
    Declined,
    /// No ticket had the id; the collection is unchanged.
    Missing,
}

/// What a successful form submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Created(TicketId),
    Updated(TicketId),
}

/// The open form and its inline errors. `editing` is set when the form was
/// opened from an existing ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketEditor {
    pub form: TicketForm,
    pub editing: Option<TicketId>,
    pub errors: FormErrors,
}

//=========================================================================================
// Manager
//=========================================================================================

pub struct TicketManager {
    repo: TicketRepository,
    clock: Arc<dyn Clock>,
    tickets: Vec<Ticket>,
    unreadable: Vec<UnreadableRecord>,
    /// Set while the stored blob as a whole could not be read.
    blocked: Option<String>,
    last_id: TicketId,
    editor: Option<TicketEditor>,
}

impl TicketManager {
    /// Creates an empty manager; call `load` to read the stored collection.
    pub fn new(repo: TicketRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            tickets: Vec::new(),
            unreadable: Vec::new(),
            blocked: None,
            last_id: 0,
            editor: None,
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Stored records that could not be decoded on the last load.
    pub fn unreadable(&self) -> &[UnreadableRecord] {
        &self.unreadable
    }

    /// Re-reads the full collection from storage.
    ///
    /// A blob that cannot be decoded at all shows as an empty collection and
    /// blocks writes until a later load succeeds.
    pub fn load(&mut self) -> PortResult<()> {
        let stored = match self.repo.load() {
            Ok(stored) => {
                self.blocked = None;
                stored
            }
            Err(PortError::Corrupt(reason)) => {
                warn!("Stored tickets are unreadable, refusing writes: {}", reason);
                self.blocked = Some(reason);
                Default::default()
            }
            Err(e) => return Err(e),
        };
        if !stored.unreadable.is_empty() {
            warn!(skipped = stored.unreadable.len(), "Some stored tickets could not be read");
        }
        self.last_id = self
            .tickets
            .iter()
            .chain(stored.tickets.iter())
            .map(|t| t.id)
            .chain(stored.unreadable.iter().filter_map(UnreadableRecord::id))
            .fold(self.last_id, TicketId::max);
        self.tickets = stored.tickets;
        self.unreadable = stored.unreadable;
        Ok(())
    }

    /// Ids follow the millisecond clock but never repeat or go backwards.
    fn next_id(&mut self) -> Result<TicketId, TicketError> {
        let floor = self
            .last_id
            .checked_add(1)
            .ok_or(TicketError::IdsExhausted(self.last_id))?;
        let id = self.clock.now_millis().max(floor);
        self.last_id = id;
        Ok(id)
    }

    fn commit(&mut self, next: Vec<Ticket>) -> PortResult<()> {
        if let Some(reason) = &self.blocked {
            return Err(PortError::Corrupt(format!(
                "stored tickets were left untouched ({})",
                reason
            )));
        }
        self.repo.save(&next, &self.unreadable)?;
        self.tickets = next;
        Ok(())
    }

    pub fn create(&mut self, form: &TicketForm) -> Result<TicketId, TicketError> {
        let draft = form.to_draft().map_err(TicketError::Invalid)?;
        let id = self.next_id()?;
        let mut next = self.tickets.clone();
        next.push(draft.into_ticket(id));
        self.commit(next)?;
        info!(ticket_id = id, "Ticket created");
        Ok(id)
    }

    pub fn update(&mut self, id: TicketId, form: &TicketForm) -> Result<(), TicketError> {
        let draft = form.to_draft().map_err(TicketError::Invalid)?;
        let position = self
            .tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or(TicketError::NotFound(id))?;
        let mut next = self.tickets.clone();
        next[position] = draft.into_ticket(id);
        self.commit(next)?;
        info!(ticket_id = id, "Ticket updated");
        Ok(())
    }

    /// Removes the ticket after `confirm` approves the prompt.
    pub fn delete<F>(&mut self, id: TicketId, confirm: F) -> Result<DeleteOutcome, TicketError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }
        if self.get(id).is_none() {
            return Ok(DeleteOutcome::Missing);
        }
        let next = self.tickets.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(next)?;
        if self.editor.as_ref().and_then(|e| e.editing) == Some(id) {
            self.editor = None;
        }
        info!(ticket_id = id, "Ticket deleted");
        Ok(DeleteOutcome::Deleted)
    }

    //-------------------------------------------------------------------------------------
    // Form workflow
    //-------------------------------------------------------------------------------------

    pub fn editor(&self) -> Option<&TicketEditor> {
        self.editor.as_ref()
    }

    /// Mutable access to the open form's fields.
    pub fn form_mut(&mut self) -> Option<&mut TicketForm> {
        self.editor.as_mut().map(|e| &mut e.form)
    }

    /// Shows the form; keeps any form that is already open.
    pub fn open_new(&mut self) {
        self.editor.get_or_insert_with(TicketEditor::default);
    }

    /// Opens the form pre-filled from an existing ticket.
    pub fn begin_edit(&mut self, id: TicketId) -> Result<(), TicketError> {
        let ticket = self.get(id).ok_or(TicketError::NotFound(id))?;
        self.editor = Some(TicketEditor {
            form: TicketForm::from_ticket(ticket),
            editing: Some(id),
            errors: FormErrors::new(),
        });
        Ok(())
    }

    /// Hides the form and clears its values and errors.
    pub fn cancel(&mut self) {
        self.editor = None;
    }

    /// Creates or updates from the open form, then resets it.
    ///
    /// Validation errors are kept on the editor for inline display.
    pub fn submit(&mut self) -> Result<Submitted, TicketError> {
        let Some(editor) = self.editor.clone() else {
            return Err(TicketError::NoForm);
        };
        let result = match editor.editing {
            Some(id) => self.update(id, &editor.form).map(|_| Submitted::Updated(id)),
            None => self.create(&editor.form).map(Submitted::Created),
        };
        match &result {
            Ok(_) => self.editor = None,
            Err(TicketError::Invalid(errors)) => {
                if let Some(open) = self.editor.as_mut() {
                    open.errors = errors.clone();
                }
            }
            Err(_) => {}
        }
        result
    }
}
