// ============================================================================
// AUTH STATE - Authentication state shared across views
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::services::session::SessionPhase;

#[derive(Clone)]
pub struct AuthState {
    pub phase: Rc<RefCell<SessionPhase>>,
    pub display_name: Rc<RefCell<Option<String>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            phase: Rc::new(RefCell::new(SessionPhase::Checking)),
            display_name: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_phase(&self, phase: SessionPhase) {
        *self.phase.borrow_mut() = phase;
    }

    pub fn get_phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    pub fn set_display_name(&self, name: Option<String>) {
        *self.display_name.borrow_mut() = name;
    }

    pub fn get_display_name(&self) -> Option<String> {
        self.display_name.borrow().clone()
    }

    pub fn logout(&self) {
        self.set_phase(SessionPhase::Unauthenticated);
        self.set_display_name(None);
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
