//! Pointer input tracking.
//!
//! Hosts feed one [`PointerSample`] per frame into an [`InputTracker`], which
//! turns raw press/position data into [`InputMessage`]s on the bus: one when a
//! press starts, one per frame of movement once the drag threshold is crossed,
//! and one when the press ends.

use crate::messenger::MessageBus;
use serde::{Deserialize, Serialize};

/// Default screen distance before a press counts as a drag
pub const DEFAULT_MOVE_THRESHOLD: f64 = 0.1;

/// Raw pointer state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PointerSample {
    /// Primary press (touch or left button)
    pub touch: bool,
    /// Secondary press (right button)
    pub alt_touch: bool,
    /// Pointer position in screen space
    pub position: (f64, f64),
}

impl PointerSample {
    pub fn pressed(x: f64, y: f64) -> Self {
        Self {
            touch: true,
            alt_touch: false,
            position: (x, y),
        }
    }

    pub fn released(x: f64, y: f64) -> Self {
        Self {
            touch: false,
            alt_touch: false,
            position: (x, y),
        }
    }
}

/// Snapshot of a press in progress, published on the bus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InputMessage {
    /// Where the press started; `None` once released
    pub down_position: Option<(f64, f64)>,
    /// Latest position while dragging
    pub move_position: Option<(f64, f64)>,
    /// Movement since the previous drag frame
    pub move_delta: (f64, f64),
    pub is_touching: bool,
    pub is_alt_touching: bool,
    /// Latched once the press has travelled past the threshold
    pub is_moving: bool,
}

impl InputMessage {
    /// Whether either button is held
    pub fn is_pressed(&self) -> bool {
        self.is_touching || self.is_alt_touching
    }
}

/// Turns per-frame pointer samples into input messages.
#[derive(Debug, Clone)]
pub struct InputTracker {
    move_threshold: f64,
    message: InputMessage,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_THRESHOLD)
    }
}

impl InputTracker {
    pub fn new(move_threshold: f64) -> Self {
        Self {
            move_threshold,
            message: InputMessage::default(),
        }
    }

    /// The press currently being tracked
    pub fn current(&self) -> &InputMessage {
        &self.message
    }

    /// Feed one frame of input. Returns the message published, if any.
    pub fn update(&mut self, sample: PointerSample, bus: &MessageBus) -> Option<InputMessage> {
        if sample.touch || sample.alt_touch {
            self.message.is_touching = sample.touch;
            self.message.is_alt_touching = sample.alt_touch;

            let Some(down) = self.message.down_position else {
                self.message.down_position = Some(sample.position);
                return Some(self.publish(bus));
            };

            let travelled = (sample.position.0 - down.0, sample.position.1 - down.1);
            let move_delta = self.try_move(sample.position, travelled)?;
            self.message.move_delta = move_delta;
            Some(self.publish(bus))
        } else {
            let was_pressed = self.message.is_pressed();
            self.clear();
            was_pressed.then(|| self.publish(bus))
        }
    }

    fn publish(&self, bus: &MessageBus) -> InputMessage {
        bus.publish(self.message);
        self.message
    }

    fn clear(&mut self) {
        self.message = InputMessage::default();
    }

    fn try_move(&mut self, position: (f64, f64), travelled: (f64, f64)) -> Option<(f64, f64)> {
        let distance = travelled.0.hypot(travelled.1);
        self.message.is_moving = self.message.is_moving || distance >= self.move_threshold;
        if !self.message.is_moving {
            return None;
        }

        let Some(previous) = self.message.move_position.replace(position) else {
            return Some((0.0, 0.0));
        };
        Some((position.0 - previous.0, position.1 - previous.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::MessageReceiver;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Sink(Vec<InputMessage>);

    impl MessageReceiver<InputMessage> for Sink {
        fn on_message_received(&mut self, message: InputMessage) {
            self.0.push(message);
        }
    }

    fn setup() -> (MessageBus, Rc<RefCell<Sink>>, InputTracker) {
        let bus = MessageBus::new();
        let sink = Rc::new(RefCell::new(Sink::default()));
        bus.subscribe::<InputMessage, _>(&sink);
        (bus, sink, InputTracker::new(1.0))
    }

    #[test]
    fn test_press_publishes_once() {
        let (bus, sink, mut tracker) = setup();
        tracker.update(PointerSample::pressed(5.0, 5.0), &bus);
        // Held still: nothing new
        assert_eq!(tracker.update(PointerSample::pressed(5.0, 5.0), &bus), None);

        let sink = sink.borrow();
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].down_position, Some((5.0, 5.0)));
        assert!(sink.0[0].is_touching);
        assert!(!sink.0[0].is_moving);
    }

    #[test]
    fn test_drag_crosses_threshold_then_reports_deltas() {
        let (bus, sink, mut tracker) = setup();
        tracker.update(PointerSample::pressed(0.0, 0.0), &bus);
        assert_eq!(tracker.update(PointerSample::pressed(0.5, 0.0), &bus), None);

        let first = tracker.update(PointerSample::pressed(2.0, 0.0), &bus);
        assert_eq!(first.map(|m| (m.is_moving, m.move_delta)), Some((true, (0.0, 0.0))));

        let second = tracker.update(PointerSample::pressed(3.0, 1.0), &bus);
        assert_eq!(second.map(|m| m.move_delta), Some((1.0, 1.0)));
        assert_eq!(second.and_then(|m| m.move_position), Some((3.0, 1.0)));

        // Back inside the threshold still counts as moving once latched
        let third = tracker.update(PointerSample::pressed(0.1, 0.0), &bus);
        assert!(third.is_some_and(|m| m.is_moving));
        assert_eq!(sink.borrow().0.len(), 4);
    }

    #[test]
    fn test_release_publishes_cleared_message() {
        let (bus, sink, mut tracker) = setup();
        tracker.update(PointerSample::pressed(0.0, 0.0), &bus);
        let released = tracker.update(PointerSample::released(0.0, 0.0), &bus);
        assert_eq!(released, Some(InputMessage::default()));

        // Idle frames publish nothing
        assert_eq!(tracker.update(PointerSample::released(0.0, 0.0), &bus), None);
        assert_eq!(sink.borrow().0.len(), 2);
    }

    #[test]
    fn test_alt_touch_counts_as_press() {
        let (bus, _sink, mut tracker) = setup();
        let sample = PointerSample {
            touch: false,
            alt_touch: true,
            position: (1.0, 1.0),
        };
        let msg = tracker.update(sample, &bus);
        assert!(msg.is_some_and(|m| m.is_alt_touching && !m.is_touching));
        assert!(tracker.current().is_pressed());
    }
}
