//! Widget base: geometry, visibility and touch dispatch
//!
//! Every on-screen part implements [`Widget`]. A widget renders itself into
//! a [`PixelBuffer`] anchored at its own position, answers hit tests against
//! its bounding box and routes touch presses to an optional listener.
//!
//! Listeners are held weakly. The application owns them (usually in an
//! `Rc`) and a widget whose listener has been dropped behaves as if it had
//! none.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use mui_panel::widget::{MotionAction, MotionEvent, TouchListener, Widget, WidgetBase};
//! use mui_panel::PixelBuffer;
//!
//! struct Dot {
//!     base: WidgetBase,
//!     pixels: PixelBuffer,
//! }
//!
//! impl Widget for Dot {
//!     fn base(&self) -> &WidgetBase { &self.base }
//!     fn base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
//!     fn matrix(&mut self) -> Option<&PixelBuffer> { Some(&self.pixels) }
//! }
//!
//! struct Counter(Cell<u32>);
//! impl TouchListener for Counter {
//!     fn on_touch(&self, _widget: &WidgetBase, _event: &MotionEvent) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//!
//! let mut dot = Dot { base: WidgetBase::new("dot"), pixels: PixelBuffer::new(4, 4) };
//! dot.set_bounds(10, 10, 4, 4);
//!
//! let counter = Rc::new(Counter(Cell::new(0)));
//! let listener: Rc<dyn TouchListener> = counter.clone();
//! dot.set_touch_listener(&listener);
//!
//! assert!(dot.dispatch_touch_event(&MotionEvent::new(14, 14, MotionAction::Down)));
//! assert!(!dot.dispatch_touch_event(&MotionEvent::new(15, 14, MotionAction::Down)));
//! assert_eq!(counter.0.get(), 1);
//! ```

use std::rc::{Rc, Weak};

use crate::matrix::PixelBuffer;

/// Touch action carried by a [`MotionEvent`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MotionAction {
    /// Finger pressed
    Down = 0,
    /// Finger moved while pressed
    Move = 1,
    /// Finger lifted
    Up = 2,
}

impl MotionAction {
    /// Decode the raw action value delivered by the touch driver
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Down),
            1 => Some(Self::Move),
            2 => Some(Self::Up),
            _ => None,
        }
    }
}

/// A decoded touch event in panel coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionEvent {
    /// Horizontal position
    pub x: i32,
    /// Vertical position
    pub y: i32,
    /// What the finger did
    pub action: MotionAction,
}

impl MotionEvent {
    /// Create a new event
    pub fn new(x: i32, y: i32, action: MotionAction) -> Self {
        Self { x, y, action }
    }
}

/// Receives touch presses that land on a widget
///
/// The listener sees the pressed widget's [`WidgetBase`] only: its name,
/// visibility and geometry. Use the name to tell widgets apart when one
/// listener serves several.
pub trait TouchListener {
    /// Called when the widget described by `widget` is pressed
    fn on_touch(&self, widget: &WidgetBase, event: &MotionEvent);
}

/// State shared by every widget
#[derive(Clone, Debug)]
pub struct WidgetBase {
    name: String,
    visible: bool,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    listener: Option<Weak<dyn TouchListener>>,
}

impl WidgetBase {
    /// Create a visible, zero-sized widget at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            listener: None,
        }
    }

    /// Widget identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the widget is drawn and hit-testable
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Left edge
    pub fn x(&self) -> u16 {
        self.x
    }

    /// Top edge
    pub fn y(&self) -> u16 {
        self.y
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether `(px, py)` lies inside the bounding box, edges included
    ///
    /// An invisible widget never hits.
    pub fn hit_test(&self, px: i32, py: i32) -> bool {
        if !self.visible {
            return false;
        }
        let left = self.x as i32;
        let top = self.y as i32;
        let right = left + self.width as i32;
        let bottom = top + self.height as i32;
        (left..=right).contains(&px) && (top..=bottom).contains(&py)
    }

    fn listener(&self) -> Option<Rc<dyn TouchListener>> {
        self.listener.as_ref().and_then(Weak::upgrade)
    }
}

/// An on-screen part that renders into a [`PixelBuffer`]
///
/// Implementors provide storage for a [`WidgetBase`] and a renderer; the
/// geometry accessors and touch dispatch are provided. Setting geometry has
/// no effect besides calling [`geometry_changed`](Self::geometry_changed),
/// which widgets with cached renders use to invalidate them.
pub trait Widget {
    /// Shared widget state
    fn base(&self) -> &WidgetBase;

    /// Shared widget state, mutably
    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Render the widget, anchored at its position
    ///
    /// Returns `None` when there is nothing to draw. Implementations may
    /// return a cached buffer.
    fn matrix(&mut self) -> Option<&PixelBuffer>;

    /// Hook run for every touch event the listener did not take
    fn on_touch(&mut self, _event: &MotionEvent) {}

    /// Hook run after position or size changes
    fn geometry_changed(&mut self) {}

    /// Widget identifier
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Rename the widget
    fn set_name(&mut self, name: &str) {
        self.base_mut().name = name.to_owned();
    }

    /// Whether the widget is drawn and hit-testable
    fn is_visible(&self) -> bool {
        self.base().visible
    }

    /// Show or hide the widget
    fn set_visible(&mut self, visible: bool) {
        self.base_mut().visible = visible;
    }

    /// Move the widget
    fn set_position(&mut self, x: u16, y: u16) {
        let base = self.base_mut();
        base.x = x;
        base.y = y;
        self.geometry_changed();
    }

    /// Resize the widget
    fn set_size(&mut self, width: u16, height: u16) {
        let base = self.base_mut();
        base.width = width;
        base.height = height;
        self.geometry_changed();
    }

    /// Move and resize the widget in one step
    fn set_bounds(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let base = self.base_mut();
        base.x = x;
        base.y = y;
        base.width = width;
        base.height = height;
        self.geometry_changed();
    }

    /// Whether `(x, y)` lies inside the widget, edges included
    fn hit_test(&self, x: i32, y: i32) -> bool {
        self.base().hit_test(x, y)
    }

    /// Register the listener for presses on this widget
    ///
    /// Only a weak reference is kept.
    fn set_touch_listener(&mut self, listener: &Rc<dyn TouchListener>) {
        self.base_mut().listener = Some(Rc::downgrade(listener));
    }

    /// Remove the touch listener
    fn clear_touch_listener(&mut self) {
        self.base_mut().listener = None;
    }

    /// Route a touch event
    ///
    /// A press inside the widget goes to the listener, if one is registered
    /// and still alive, and the event counts as handled. Anything else runs
    /// [`on_touch`](Self::on_touch) and is reported as not handled.
    fn dispatch_touch_event(&mut self, event: &MotionEvent) -> bool {
        if event.action == MotionAction::Down && self.hit_test(event.x, event.y) {
            if let Some(listener) = self.base().listener() {
                listener.on_touch(self.base(), event);
                return true;
            }
        }
        self.on_touch(event);
        false
    }
}
