//! End-to-end behaviour of the controller and the terminal front end over an
//! in-memory store.

use app_lib::adapters::MemoryStore;
use app_lib::config::Config;
use app_lib::ui::auth::{LOGIN_FAILED, SIGNUP_FAILED};
use app_lib::ui::form::Field;
use app_lib::ui::tickets::{TicketForm, NO_FORM};
use app_lib::ui::toast::NotificationKind;
use app_lib::ui::{run, AppState, Controller, Shell};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use ticketflow_core::domain::{Route, TicketStatus};
use ticketflow_core::ports::{Clock, KeyValueStore, PortError, PortResult};
use tokio::io::BufReader;

const SESSION_KEY: &str = "ticketapp_session";
const TICKETS_KEY: &str = "tickets";

/// Advances one millisecond per reading.
struct StepClock(AtomicU64);

impl Clock for StepClock {
    fn now_millis(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// A `MemoryStore` whose tickets key can be made to fail on demand.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_ticket_reads: AtomicBool,
    fail_ticket_writes: AtomicBool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        if key == TICKETS_KEY && self.fail_ticket_reads.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("read failed".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        if key == TICKETS_KEY && self.fail_ticket_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("write failed".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.inner.remove(key)
    }
}

fn app_state(store: Arc<dyn KeyValueStore>) -> Arc<AppState> {
    let clock = Arc::new(StepClock(AtomicU64::new(1_730_000_000_000)));
    Arc::new(AppState::new(Arc::new(Config::default()), store, clock))
}

fn signed_in(store: Arc<MemoryStore>) -> Controller {
    let mut controller = Controller::start(app_state(store));
    controller.login("a@b.com", "secret1").unwrap();
    controller
}

fn form(title: &str, status: &str, priority: &str) -> TicketForm {
    TicketForm::new(title, "", status, priority)
}

#[test]
fn login_persists_session_and_lands_on_dashboard() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = Controller::start(app_state(store.clone()));
    assert_eq!(controller.route(), Route::Landing);

    controller.login("a@b.com", "secret1").unwrap();

    assert_eq!(controller.route(), Route::Dashboard);
    assert_eq!(controller.session().unwrap().email, "a@b.com");
    let raw = store.get(SESSION_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["email"], "a@b.com");
}

#[test]
fn short_passwords_never_create_a_session() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = Controller::start(app_state(store.clone()));
    controller.navigate(Route::Login);

    let err = controller.login("a@b.com", "12345").unwrap_err();
    assert_eq!(err.to_string(), LOGIN_FAILED);
    let err = controller.signup("a@b.com", "abc").unwrap_err();
    assert_eq!(err.to_string(), SIGNUP_FAILED);

    assert!(controller.session().is_none());
    assert_eq!(controller.route(), Route::Login);
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn guard_sends_signed_out_users_to_login() {
    let mut controller = Controller::start(app_state(Arc::new(MemoryStore::new())));
    controller.navigate(Route::Dashboard);
    assert_eq!(controller.route(), Route::Login);
    controller.navigate(Route::Tickets);
    assert_eq!(controller.route(), Route::Login);
}

#[test]
fn logout_clears_session_and_protects_routes_again() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = signed_in(store.clone());
    controller.logout();

    assert_eq!(controller.route(), Route::Landing);
    assert!(controller.session().is_none());
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    controller.navigate(Route::Tickets);
    assert_eq!(controller.route(), Route::Login);
}

#[test]
fn session_is_restored_on_start_and_corrupt_one_is_dropped() {
    let store = Arc::new(MemoryStore::new());
    signed_in(store.clone());
    let restarted = Controller::start(app_state(store.clone()));
    assert_eq!(restarted.session().unwrap().email, "a@b.com");

    let corrupt = Arc::new(MemoryStore::with_entries([(SESSION_KEY, "not json")]));
    let mut controller = Controller::start(app_state(corrupt.clone()));
    assert!(controller.session().is_none());
    assert_eq!(corrupt.get(SESSION_KEY).unwrap(), None);
    controller.navigate(Route::Dashboard);
    assert_eq!(controller.route(), Route::Login);
}

#[test]
fn created_ticket_round_trips_and_updates_stats() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = signed_in(store.clone());
    let before = controller.stats();

    let id = controller
        .tickets_mut()
        .create(&form("Printer broken", "open", "high"))
        .unwrap();

    let after = controller.stats();
    assert_eq!(after.open, before.open + 1);
    assert_eq!(after.total, before.total + 1);

    let mut reloaded = Controller::start(app_state(store));
    reloaded.login("a@b.com", "secret1").unwrap();
    let ticket = reloaded.tickets().get(id).unwrap().clone();
    assert_eq!(TicketForm::from_ticket(&ticket), form("Printer broken", "open", "high"));
}

#[test]
fn update_replaces_only_the_matching_ticket() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = signed_in(store);
    let manager = controller.tickets_mut();
    let other = manager.create(&form("Monitor flicker", "in_progress", "low")).unwrap();
    let existing = manager.create(&form("Printer broken", "open", "high")).unwrap();

    manager
        .update(existing, &form("Printer fixed", "closed", "high"))
        .unwrap();

    let updated = manager.get(existing).unwrap();
    assert_eq!(updated.title, "Printer fixed");
    assert_eq!(updated.status, TicketStatus::Closed);
    let untouched = manager.get(other).unwrap();
    assert_eq!(untouched.title, "Monitor flicker");
    assert_eq!(untouched.status, TicketStatus::InProgress);
}

#[test]
fn blank_title_leaves_persisted_collection_alone() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = signed_in(store.clone());
    controller
        .tickets_mut()
        .create(&form("Existing", "open", "low"))
        .unwrap();
    let persisted = store.get(TICKETS_KEY).unwrap();

    for title in ["", "   ", "\n\t"] {
        assert!(controller
            .tickets_mut()
            .create(&form(title, "open", "low"))
            .is_err());
    }
    assert_eq!(store.get(TICKETS_KEY).unwrap(), persisted);
    assert_eq!(controller.tickets().tickets().len(), 1);
}

#[test]
fn dashboard_sees_writes_made_outside_the_controller() {
    let store = Arc::new(MemoryStore::new());
    let mut controller = signed_in(store.clone());
    assert_eq!(controller.stats().total, 0);

    store
        .set(
            TICKETS_KEY,
            r#"[{"id":1,"title":"From another tab","description":"","status":"closed","priority":"low"}]"#,
        )
        .unwrap();
    controller.navigate(Route::Dashboard);
    assert_eq!(controller.stats().closed, 1);
}

#[test]
fn failed_ticket_writes_keep_state_and_raise_error_notifications() {
    let store = Arc::new(FlakyStore::default());
    let mut controller = Controller::start(app_state(store.clone()));
    controller.login("a@b.com", "secret1").unwrap();
    let id = controller
        .tickets_mut()
        .create(&form("Printer broken", "open", "high"))
        .unwrap();
    let persisted = store.get(TICKETS_KEY).unwrap();

    store.fail_ticket_writes.store(true, Ordering::SeqCst);
    controller.tickets_mut().open_new();
    controller.tickets_mut().form_mut().unwrap().title = "Monitor flicker".to_string();
    let notice = controller.submit_ticket().unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);
    assert!(controller.tickets().editor().is_some());

    controller.tickets_mut().begin_edit(id).unwrap();
    controller.tickets_mut().form_mut().unwrap().status = "closed".to_string();
    let notice = controller.submit_ticket().unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);

    let notice = controller.delete_ticket(id, |_| true).unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);

    let tickets = controller.tickets().tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].status, TicketStatus::Open);
    assert_eq!(store.get(TICKETS_KEY).unwrap(), persisted);
}

#[test]
fn login_reports_tickets_that_cannot_be_read() {
    let store = Arc::new(FlakyStore::default());
    store.fail_ticket_reads.store(true, Ordering::SeqCst);
    let mut controller = Controller::start(app_state(store));

    let notice = controller.login("a@b.com", "secret1").unwrap().unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);
    assert_eq!(notice.message, "Failed to load tickets");
    assert_eq!(controller.route(), Route::Dashboard);
}

#[test]
fn one_unreadable_ticket_does_not_wipe_the_rest() {
    let store = Arc::new(MemoryStore::with_entries([(
        TICKETS_KEY,
        r#"[{"id":1,"title":"One","description":"","status":"open","priority":"low"},
            {"id":2,"title":"Two","description":"","status":"open","priority":"low"},
            {"id":3,"title":"Three","description":"","status":"done","priority":"low"}]"#,
    )]));
    let mut controller = signed_in(store.clone());
    assert_eq!(controller.stats().total, 2);

    controller
        .tickets_mut()
        .create(&form("New", "open", "low"))
        .unwrap();

    let raw = store.get(TICKETS_KEY).unwrap().unwrap();
    let stored: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let mut ids: Vec<_> = stored.iter().map(|t| t["id"].as_u64().unwrap()).collect();
    ids.sort_unstable();
    assert_eq!(ids.len(), 4);
    assert_eq!(&ids[..3], &[1, 2, 3]);
}

//=========================================================================================
// Terminal front end
//=========================================================================================

#[tokio::test]
async fn shell_walks_through_a_full_session() {
    let store = Arc::new(MemoryStore::new());
    let (mut shell, _expired) = Shell::new(Controller::start(app_state(store.clone())));

    shell.handle_line("dashboard");
    assert_eq!(shell.controller().route(), Route::Login);

    shell.handle_line("login bad-email 123");
    assert_eq!(shell.auth_errors()[&Field::Email], "Invalid email format");
    assert!(shell.controller().session().is_none());

    shell.handle_line("login a@b.com secret1");
    assert_eq!(shell.controller().route(), Route::Dashboard);
    assert!(shell.auth_errors().is_empty());

    shell.handle_line("tickets");
    shell.handle_line("submit");
    assert_eq!(shell.notification().unwrap().message, NO_FORM);
    assert_eq!(shell.notification().unwrap().kind, NotificationKind::Error);

    shell.handle_line("new");
    shell.handle_line("submit");
    assert!(shell.screen().contains("Title is required"));

    shell.handle_line("title Printer broken");
    shell.handle_line("priority high");
    shell.handle_line("submit");
    let notice = shell.notification().unwrap();
    assert_eq!(notice.message, "Ticket created successfully");
    assert_eq!(notice.kind, NotificationKind::Success);
    let id = shell.controller().tickets().tickets()[0].id;

    shell.handle_line(&format!("delete {id}"));
    assert_eq!(shell.pending_delete(), Some(id));
    assert!(shell.screen().contains("Are you sure you want to delete this ticket?"));
    shell.handle_line("n");
    assert_eq!(shell.controller().tickets().tickets().len(), 1);

    shell.handle_line(&format!("delete {id}"));
    shell.handle_line("y");
    assert!(shell.controller().tickets().tickets().is_empty());
    assert_eq!(
        shell.notification().unwrap().message,
        "Ticket deleted successfully"
    );

    shell.handle_line("logout");
    assert_eq!(shell.controller().route(), Route::Landing);
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
}

#[tokio::test]
async fn shell_shows_ticket_load_failure_after_login() {
    let store = Arc::new(FlakyStore::default());
    store.fail_ticket_reads.store(true, Ordering::SeqCst);
    let (mut shell, _expired) = Shell::new(Controller::start(app_state(store)));

    shell.handle_line("login a@b.com secret1");
    assert_eq!(shell.controller().route(), Route::Dashboard);
    let notice = shell.notification().unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);
    assert_eq!(notice.message, "Failed to load tickets");
}

#[tokio::test]
async fn bad_input_is_reported_without_changing_state() {
    let (mut shell, _expired) = Shell::new(Controller::start(app_state(Arc::new(MemoryStore::new()))));
    shell.handle_line("signup a@b.com");
    assert_eq!(shell.controller().route(), Route::Signup);
    assert_eq!(shell.auth_errors()[&Field::Password], "Password is required");
    assert!(shell.notification().is_none());

    shell.handle_line("bogus");
    assert_eq!(shell.notification().unwrap().kind, NotificationKind::Error);

    shell.handle_line("new");
    assert_eq!(
        shell.notification().unwrap().message,
        "Open the ticket screen first (tickets)"
    );
    assert!(shell.controller().session().is_none());
}

#[tokio::test]
async fn run_renders_screens_until_quit() {
    let store = Arc::new(MemoryStore::new());
    let (shell, expired) = Shell::new(Controller::start(app_state(store)));
    let input = BufReader::new(&b"login a@b.com secret1\nquit\nlogout\n"[..]);
    let mut output = Vec::new();

    run(shell, expired, input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("TicketFlow"));
    assert!(text.contains("Total Tickets"));
    assert!(text.contains("a@b.com"));
}
