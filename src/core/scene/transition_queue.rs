//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for scene transitions.
//
// Scenes never hold the scene manager. They record switch requests here
// during input handling or update; the frame driver hands the queue to
// the manager at the frame boundary, which performs every exit/enter.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneArgs, SceneKey, SceneTransition};

//=== Transition Queue ====================================================

/// Pending scene transitions, processed in FIFO order.
#[derive(Debug)]
pub struct TransitionQueue<S: SceneKey> {
    queue: Vec<SceneTransition<S>>,
}

impl<S: SceneKey> TransitionQueue<S> {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition to be processed at the next frame boundary.
    pub fn push(&mut self, transition: SceneTransition<S>) {
        self.queue.push(transition);
    }

    /// Requests a switch to `scene` with `args`.
    pub fn switch_scene(&mut self, scene: S, args: SceneArgs) {
        self.push(SceneTransition::Switch(scene, args));
    }

    /// Requests application shutdown.
    pub fn quit(&mut self) {
        self.push(SceneTransition::Quit);
    }

    /// Returns an iterator over the queued transitions.
    pub fn iter(&self) -> impl Iterator<Item = &SceneTransition<S>> {
        self.queue.iter()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Clears all queued transitions.
    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneTransition<S>> {
        std::mem::take(&mut self.queue)
    }
}

impl<S: SceneKey> Default for TransitionQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
