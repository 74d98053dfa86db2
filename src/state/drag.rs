use super::gesture::{GestureSession, PointerSample};
use crate::geo::Projection;

/// Mouse/touch drag in progress. Touch contacts can be added or lifted
/// mid-drag; each change of contact count starts a fresh session from the
/// current rotation so the globe does not jump between pan and twist.
#[derive(Default, Debug, Clone)]
pub struct DragState {
    pub session: Option<GestureSession>,
    pub contacts: usize,
    pub active: bool,
}

impl DragState {
    pub fn begin(&mut self, projection: &Projection, sample: PointerSample, contacts: usize) {
        self.active = true;
        self.contacts = contacts;
        self.session = GestureSession::begin(projection, sample);
        match &self.session {
            Some(session) => log::debug!("drag from rotation {:?}", session.baseline_rotation()),
            None => log::debug!("drag started off the sphere at {:?}", sample.point()),
        }
    }

    /// Applies a move. Returns whether the projection changed and needs a
    /// redraw.
    pub fn drag(&mut self, projection: &mut Projection, sample: PointerSample, contacts: usize) -> bool {
        if !self.active {
            return false;
        }
        if contacts != self.contacts {
            self.begin(projection, sample, contacts);
            return false;
        }
        match &self.session {
            Some(session) => session.apply(projection, sample),
            None => false,
        }
    }

    /// Hover lookups pause while dragging so the popover never trails the
    /// rotation.
    pub fn allows_hover(&self) -> bool {
        !self.active
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }
}
