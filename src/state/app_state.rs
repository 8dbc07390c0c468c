// ============================================================================
// APP STATE - Global application state
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::worker::{Worker, WorkerFilter};
use crate::state::AuthState;

/// Global application state: auth phase plus the worker-list UI state.
/// All mutation happens on the single event-loop thread; Rc<RefCell> is the
/// sharing pattern across view closures.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,

    // Worker list
    pub workers: Rc<RefCell<Vec<Worker>>>,
    pub loading: Rc<RefCell<bool>>,
    pub loaded_once: Rc<RefCell<bool>>,
    pub search_term: Rc<RefCell<String>>,
    pub status_filter: Rc<RefCell<WorkerFilter>>,

    // Degraded mode (listing endpoint unreachable)
    pub api_error: Rc<RefCell<Option<String>>>,
    pub using_fallback: Rc<RefCell<bool>>,

    // Modal visibility
    pub selected_worker: Rc<RefCell<Option<Worker>>>,
    pub show_add_modal: Rc<RefCell<bool>>,

    // Reactivity: subscribers notified on state changes
    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            auth: AuthState::new(),
            workers: Rc::new(RefCell::new(Vec::new())),
            loading: Rc::new(RefCell::new(false)),
            loaded_once: Rc::new(RefCell::new(false)),
            search_term: Rc::new(RefCell::new(String::new())),
            status_filter: Rc::new(RefCell::new(WorkerFilter::All)),
            api_error: Rc::new(RefCell::new(None)),
            using_fallback: Rc::new(RefCell::new(false)),
            selected_worker: Rc::new(RefCell::new(None)),
            show_add_modal: Rc::new(RefCell::new(false)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn subscribe_to_changes<F: Fn() + 'static>(&self, callback: F) {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_change(&self) {
        let subscribers = self.change_subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber();
        }
    }

    /// Prepend a newly created worker so it shows at the top of the list.
    pub fn add_worker(&self, worker: Worker) {
        self.workers.borrow_mut().insert(0, worker);
        self.notify_change();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
