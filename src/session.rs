// src/session.rs
//
// Navigation core for one tour attempt: tracks the current (image, hotspot)
// position, the set of visited positions, step numbering and completion.
// Pure Rust on purpose so the whole state machine is unit-testable; the Yew
// component only calls into it and redraws from the result.

use crate::tour_data::Group;
use std::collections::HashSet;

/// One step of the tour: an image index plus a hotspot index on that image.
/// Only pairs with `hotspot < boxes.len()` are valid steps; an image without
/// hotspots never appears as a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub image: usize,
    pub hotspot: usize,
}

impl Position {
    pub const START: Position = Position { image: 0, hotspot: 0 };

    pub fn new(image: usize, hotspot: usize) -> Self {
        Self { image, hotspot }
    }
}

/// Result of advancing past the current hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(Position),
    /// The sequence is exhausted; the tour is now complete.
    Completed,
}

/// Mutable state for a single tour attempt. Created from a [`Group`] at load
/// time; every navigation operation goes through this object.
#[derive(Debug, Clone, PartialEq)]
pub struct TourSession {
    /// Hotspot count per image, captured once at load. `total_steps` is
    /// derived from it and never renegotiated mid-attempt.
    steps_per_image: Vec<usize>,
    total_steps: usize,
    current: Position,
    visited: HashSet<Position>,
    completed: bool,
    exit_step: usize,
}

impl TourSession {
    /// Builds a session for `group`. Rejects groups with no images or no
    /// hotspots at all: such a tour has nothing to step through.
    pub fn new(group: &Group) -> Result<Self, String> {
        if group.images.is_empty() {
            return Err("invalid configuration: group has no images".to_string());
        }
        let steps_per_image: Vec<usize> = group.images.iter().map(|img| img.boxes.len()).collect();
        let total_steps: usize = steps_per_image.iter().sum();
        if total_steps == 0 {
            return Err("invalid configuration: group has no hotspots".to_string());
        }
        let mut session = Self {
            steps_per_image,
            total_steps,
            current: Position::START,
            visited: HashSet::new(),
            completed: false,
            exit_step: 0,
        };
        // The first image may have no hotspots; start on the first real step.
        session.current = session.first_step();
        Ok(session)
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn exit_step(&self) -> usize {
        self.exit_step
    }

    /// Number of distinct steps visited so far in this attempt.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Marks the current position visited. Must be called when the group is
    /// first displayed, otherwise no position is reachable and navigation
    /// stays stuck on step one.
    pub fn begin(&mut self) {
        self.mark_visited(self.current);
    }

    /// True when the user may jump straight to `pos`: always after
    /// completion, otherwise only for already-visited steps.
    pub fn is_reachable(&self, pos: Position) -> bool {
        self.completed || self.visited.contains(&pos)
    }

    /// Set insert, so re-marking a visited position is a no-op.
    pub fn mark_visited(&mut self, pos: Position) {
        self.visited.insert(pos);
    }

    pub fn is_visited(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }

    /// The position after `pos` in linear order, skipping images without
    /// hotspots. `None` means the sequence is exhausted.
    pub fn next(&self, pos: Position) -> Option<Position> {
        if pos.hotspot + 1 < self.hotspots_on(pos.image) {
            return Some(Position::new(pos.image, pos.hotspot + 1));
        }
        ((pos.image + 1)..self.steps_per_image.len())
            .find(|&i| self.steps_per_image[i] > 0)
            .map(|i| Position::new(i, 0))
    }

    /// The position before `pos`, symmetric to [`next`](Self::next). `None`
    /// means `pos` is already the first step.
    pub fn previous(&self, pos: Position) -> Option<Position> {
        if pos.hotspot > 0 {
            return Some(Position::new(pos.image, pos.hotspot - 1));
        }
        (0..pos.image)
            .rev()
            .find(|&i| self.steps_per_image[i] > 0)
            .map(|i| Position::new(i, self.steps_per_image[i] - 1))
    }

    /// Hotspot-click path: moves to the next step and marks it visited, or
    /// latches completion when the current step was the last one. This is the
    /// only operation that unlocks new territory.
    pub fn advance(&mut self) -> Advance {
        match self.next(self.current) {
            Some(pos) => {
                self.current = pos;
                self.mark_visited(pos);
                Advance::Moved(pos)
            }
            None => {
                self.completed = true;
                self.exit_step = self.total_steps;
                Advance::Completed
            }
        }
    }

    /// Steps back one position. No reachability check: the destination is
    /// always part of history by construction. Returns false at the start.
    pub fn retreat(&mut self) -> bool {
        match self.previous(self.current) {
            Some(pos) => {
                self.current = pos;
                self.mark_visited(pos);
                true
            }
            None => false,
        }
    }

    /// Jumps directly to `pos` if it is a valid step and reachable. Rejected
    /// jumps are silent no-ops: stale pagination clicks are routine, not
    /// errors. Returns whether the cursor moved.
    pub fn jump_to(&mut self, pos: Position) -> bool {
        if pos.hotspot >= self.hotspots_on(pos.image) {
            return false;
        }
        if !self.is_reachable(pos) {
            return false;
        }
        self.current = pos;
        self.mark_visited(pos);
        true
    }

    /// 1-based ordinal of `pos` in the linear order, for display.
    pub fn step_number(&self, pos: Position) -> usize {
        let before: usize = self.steps_per_image[..pos.image.min(self.steps_per_image.len())]
            .iter()
            .sum();
        before + pos.hotspot + 1
    }

    /// Clears the attempt: back to the first step, nothing visited, the
    /// completion latch released. Callers re-enter with [`begin`](Self::begin)
    /// and trigger their own redraw.
    pub fn reset(&mut self) {
        self.current = self.first_step();
        self.visited.clear();
        self.completed = false;
        self.exit_step = 0;
    }

    fn first_step(&self) -> Position {
        (0..self.steps_per_image.len())
            .find(|&i| self.steps_per_image[i] > 0)
            .map(|i| Position::new(i, 0))
            .unwrap_or(Position::START)
    }

    fn hotspots_on(&self, image: usize) -> usize {
        self.steps_per_image.get(image).copied().unwrap_or(0)
    }
}

/// Observer list for tour completion. Listeners fire exactly once per
/// attempt, in registration order; `reset` re-arms them for the next attempt.
#[derive(Default)]
pub struct CompletionHooks {
    listeners: Vec<Box<dyn Fn()>>,
    notified: bool,
}

impl CompletionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: Fn() + 'static>(&mut self, listener: F) {
        self.listeners.push(Box::new(listener));
    }

    /// Fires all listeners in registration order, at most once per attempt.
    pub fn notify(&mut self) {
        if self.notified {
            return;
        }
        self.notified = true;
        for listener in &self.listeners {
            listener();
        }
    }

    pub fn reset(&mut self) {
        self.notified = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour_data::{Hotspot, TourImage};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn hotspot() -> Hotspot {
        Hotspot {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            title: None,
            description: None,
        }
    }

    fn group(box_counts: &[usize]) -> Group {
        Group {
            title: "Test".to_string(),
            description: None,
            images: box_counts
                .iter()
                .map(|&n| TourImage {
                    src: "img".to_string(),
                    boxes: (0..n).map(|_| hotspot()).collect(),
                    ..TourImage::default()
                })
                .collect(),
        }
    }

    fn session(box_counts: &[usize]) -> TourSession {
        let mut s = TourSession::new(&group(box_counts)).expect("valid group");
        s.begin();
        s
    }

    #[test]
    fn test_rejects_empty_group() {
        assert!(TourSession::new(&group(&[])).is_err());
        assert!(TourSession::new(&group(&[0, 0])).is_err());
    }

    #[test]
    fn test_begin_marks_first_position() {
        let s = session(&[2, 1]);
        assert_eq!(s.current(), Position::new(0, 0));
        assert!(s.is_visited(Position::new(0, 0)));
        assert_eq!(s.visited_count(), 1);
    }

    #[test]
    fn test_forward_traversal_yields_dense_step_numbers() {
        let s = session(&[2, 0, 3, 1]);
        assert_eq!(s.total_steps(), 6);
        let mut pos = s.current();
        let mut numbers = vec![s.step_number(pos)];
        while let Some(next) = s.next(pos) {
            numbers.push(s.step_number(next));
            pos = next;
        }
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_next_previous_round_trip_on_interior_positions() {
        let s = session(&[2, 0, 3, 1]);
        let mut pos = s.current();
        while let Some(next) = s.next(pos) {
            assert_eq!(s.next(s.previous(next).unwrap()), Some(next));
            pos = next;
        }
    }

    #[test]
    fn test_next_skips_images_without_hotspots() {
        let s = session(&[1, 0, 0, 2]);
        assert_eq!(s.next(Position::new(0, 0)), Some(Position::new(3, 0)));
        assert_eq!(s.previous(Position::new(3, 0)), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_first_step_skips_leading_empty_image() {
        let s = session(&[0, 2]);
        assert_eq!(s.current(), Position::new(1, 0));
        assert_eq!(s.step_number(s.current()), 1);
    }

    #[test]
    fn test_advance_walks_and_marks_visited() {
        let mut s = session(&[2, 1]);
        assert_eq!(s.advance(), Advance::Moved(Position::new(0, 1)));
        assert_eq!(s.advance(), Advance::Moved(Position::new(1, 0)));
        assert_eq!(s.visited_count(), 3);
        assert!(!s.is_completed());
        assert_eq!(s.advance(), Advance::Completed);
        assert!(s.is_completed());
        assert_eq!(s.exit_step(), 3);
    }

    #[test]
    fn test_reachability_tracks_visited_until_completed() {
        let mut s = session(&[2, 1]);
        assert!(s.is_reachable(Position::new(0, 0)));
        assert!(!s.is_reachable(Position::new(0, 1)));
        assert!(!s.is_reachable(Position::new(1, 0)));
        s.advance();
        assert!(s.is_reachable(Position::new(0, 1)));
        s.advance();
        s.advance();
        // Completed: everything is open for free exploration.
        assert!(s.is_reachable(Position::new(1, 0)));
        assert!(s.is_reachable(Position::new(0, 1)));
    }

    #[test]
    fn test_rejected_jump_changes_nothing() {
        let mut s = session(&[2, 1]);
        let before = s.clone();
        assert!(!s.jump_to(Position::new(1, 0)));
        assert!(!s.jump_to(Position::new(5, 0)));
        assert!(!s.jump_to(Position::new(0, 7)));
        assert_eq!(s, before);
    }

    #[test]
    fn test_jump_to_visited_position() {
        let mut s = session(&[2, 1]);
        s.advance();
        assert!(s.jump_to(Position::new(0, 0)));
        assert_eq!(s.current(), Position::new(0, 0));
        // Re-marking an already visited step does not inflate the count.
        assert_eq!(s.visited_count(), 2);
    }

    #[test]
    fn test_retreat_needs_no_reachability() {
        let mut s = session(&[2, 1]);
        s.advance();
        assert!(s.retreat());
        assert_eq!(s.current(), Position::new(0, 0));
        assert!(!s.retreat());
        assert_eq!(s.current(), Position::new(0, 0));
    }

    #[test]
    fn test_completed_tour_stays_open_for_review() {
        let mut s = session(&[2, 1]);
        s.advance();
        s.advance();
        assert_eq!(s.advance(), Advance::Completed);
        // Stepping back from the end does not disturb the completion latch,
        // so every dot stays reachable while the user reviews.
        assert!(s.retreat());
        assert_eq!(s.current(), Position::new(0, 1));
        assert!(s.is_completed());
        assert_eq!(s.exit_step(), 3);
        assert!(s.jump_to(Position::new(1, 0)));
        assert!(s.jump_to(Position::new(0, 0)));
        assert!(s.is_completed());
        assert_eq!(s.visited_count(), 3);
        // Re-walking the last step latches completion again, not an error.
        s.jump_to(Position::new(1, 0));
        assert_eq!(s.advance(), Advance::Completed);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut s = session(&[2, 1]);
        s.advance();
        s.advance();
        s.advance();
        assert!(s.is_completed());
        s.reset();
        s.begin();
        assert_eq!(s.current(), Position::new(0, 0));
        assert_eq!(s.visited_count(), 1);
        assert!(!s.is_completed());
        assert_eq!(s.exit_step(), 0);
        assert_eq!(s.total_steps(), 3);
    }

    #[test]
    fn test_two_image_scenario() {
        // Group with 2 images: image0 has 2 boxes, image1 has 1 box.
        let mut s = session(&[2, 1]);
        assert_eq!(s.total_steps(), 3);
        assert_eq!(s.step_number(s.current()), 1);
        s.advance();
        assert_eq!(s.step_number(s.current()), 2);
        s.advance();
        assert_eq!(s.step_number(s.current()), 3);
        assert_eq!(s.advance(), Advance::Completed);
        assert!(s.is_completed());
    }

    #[test]
    fn test_completion_hooks_fire_once_in_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = CompletionHooks::new();
        for tag in ["first", "second"] {
            let calls = calls.clone();
            hooks.register(move || calls.borrow_mut().push(tag));
        }
        hooks.notify();
        hooks.notify();
        assert_eq!(*calls.borrow(), vec!["first", "second"]);
        hooks.reset();
        hooks.notify();
        assert_eq!(*calls.borrow(), vec!["first", "second", "first", "second"]);
    }
}
