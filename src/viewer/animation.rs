//! Run/stop state of the rotation loop
//!
//! The loop owns at most one pending [`FrameHandle`]. Starting registers one,
//! stopping cancels it, and each running tick replaces it with the next request.

use crate::gfx::backend::{FrameHandle, RenderBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct AnimationLoop {
    state: AnimationState,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl AnimationLoop {
    /// A stopped loop with nothing scheduled
    pub fn new() -> Self {
        Self {
            state: AnimationState::Stopped,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames ticked while running since the session began
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns false if the loop was already running
    pub fn start<B: RenderBackend>(&mut self, backend: &mut B) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = AnimationState::Running;
        self.pending = Some(backend.request_frame());
        true
    }

    /// Returns false if the loop was already stopped
    pub fn stop<B: RenderBackend>(&mut self, backend: &mut B) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = AnimationState::Stopped;
        if let Some(handle) = self.pending.take() {
            backend.cancel_frame(handle);
        }
        true
    }

    /// Consumes the current frame and schedules the next one
    pub fn advance<B: RenderBackend>(&mut self, backend: &mut B) {
        if !self.is_running() {
            return;
        }
        self.frames += 1;
        self.pending = Some(backend.request_frame());
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::RecordingBackend;

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut animation = AnimationLoop::new();

        assert!(animation.start(&mut backend));
        assert!(!animation.start(&mut backend));
        assert_eq!(backend.frames_requested, 1);

        assert!(animation.stop(&mut backend));
        assert!(!animation.stop(&mut backend));
        assert_eq!(backend.frames_cancelled, 1);
        assert!(animation.pending_frame().is_none());
    }

    #[test]
    fn test_advance_only_while_running() {
        let mut backend = RecordingBackend::new();
        let mut animation = AnimationLoop::new();

        animation.advance(&mut backend);
        assert_eq!(animation.frames(), 0);
        assert_eq!(backend.frames_requested, 0);

        animation.start(&mut backend);
        animation.advance(&mut backend);
        assert_eq!(animation.frames(), 1);
        assert_eq!(backend.frames_requested, 2);
        assert_eq!(animation.pending_frame(), backend.pending_frame);
    }
}
