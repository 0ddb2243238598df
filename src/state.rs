//! Scene navigation store.
//!
//! One explicitly constructed store owns the scene registry, the loaded
//! datasets, the current scene index, and the subscriber list. Navigation
//! clamps to the registry bounds and notifies every subscriber
//! synchronously, in subscription order, before returning. Listeners
//! cannot call back into the store during the fan-out (it is exclusively
//! borrowed while notifying), so navigation is never re-entrant.

use crate::data::{PlanetRecord, SystemRecord};
use crate::scene::SceneDescriptor;

#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub planets: Vec<PlanetRecord>,
    pub systems: Vec<SystemRecord>,
}

/// Handle returned by `subscribe`; pass back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SceneDescriptor)>;

pub struct SceneStore {
    scenes: Vec<SceneDescriptor>,
    current: usize,
    pub datasets: Datasets,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

impl SceneStore {
    pub fn new(scenes: Vec<SceneDescriptor>) -> Self {
        assert!(!scenes.is_empty(), "scene registry must not be empty");
        Self {
            scenes,
            current: 0,
            datasets: Datasets::default(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn set_datasets(&mut self, datasets: Datasets) {
        self.datasets = datasets;
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_scene(&self) -> &SceneDescriptor {
        &self.scenes[self.current]
    }

    /// Jump to a scene; out-of-bounds indices clamp to [0, n-1]. Every
    /// subscriber runs exactly once before this returns.
    pub fn go_to(&mut self, index: isize) {
        let max = self.scenes.len() as isize - 1;
        self.current = index.clamp(0, max) as usize;
        let scene = &self.scenes[self.current];
        for (_, listener) in &mut self.listeners {
            listener(scene);
        }
    }

    pub fn next_scene(&mut self) {
        self.go_to(self.current as isize + 1);
    }

    pub fn prev_scene(&mut self) {
        self.go_to(self.current as isize - 1);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SceneDescriptor) + 'static) -> SubscriptionId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(lid, _)| *lid != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::build_scenes;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store() -> SceneStore {
        SceneStore::new(build_scenes())
    }

    #[test]
    fn starts_at_scene_zero() {
        assert_eq!(store().current_index(), 0);
    }

    #[test]
    fn go_to_clamps_to_valid_range() {
        let mut s = store();
        let last = s.scene_count() - 1;

        s.go_to(-10);
        assert_eq!(s.current_index(), 0);

        s.go_to(999);
        assert_eq!(s.current_index(), last);
    }

    #[test]
    fn next_is_idempotent_at_the_last_scene() {
        let mut s = store();
        let last = s.scene_count() - 1;
        s.go_to(last as isize - 1);
        s.next_scene();
        assert_eq!(s.current_index(), last);
        s.next_scene();
        assert_eq!(s.current_index(), last);
    }

    #[test]
    fn prev_is_idempotent_at_scene_zero() {
        let mut s = store();
        s.go_to(1);
        s.prev_scene();
        assert_eq!(s.current_index(), 0);
        s.prev_scene();
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn each_subscriber_runs_exactly_once_per_navigation() {
        let mut s = store();
        let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let a = seen.clone();
        s.subscribe(move |scene| a.borrow_mut().push(scene.id));
        let b = seen.clone();
        s.subscribe(move |scene| b.borrow_mut().push(scene.id));

        s.go_to(1);
        // both listeners ran synchronously, before go_to returned
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow().iter().all(|id| *id == "S2_0_PLANETS_RAW"));
    }

    #[test]
    fn unsubscribed_listeners_stay_silent() {
        let mut s = store();
        let count = Rc::new(RefCell::new(0usize));

        let c = count.clone();
        let sub = s.subscribe(move |_| *c.borrow_mut() += 1);

        s.go_to(2);
        assert_eq!(*count.borrow(), 1);

        s.unsubscribe(sub);
        s.go_to(3);
        s.go_to(0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn go_to_notifies_even_when_index_is_unchanged() {
        let mut s = store();
        let count = Rc::new(RefCell::new(0usize));
        let c = count.clone();
        s.subscribe(move |_| *c.borrow_mut() += 1);

        s.go_to(0);
        s.go_to(0);
        assert_eq!(*count.borrow(), 2);
    }
}
