//! Screen container
//!
//! A [`Layout`] owns a set of child widgets and composes their renders into
//! one buffer, usually the size of the whole panel, ready for
//! [`Display::set_layout`](crate::display::Display::set_layout).

use crate::command::{PANEL_HEIGHT, PANEL_WIDTH};
use crate::matrix::PixelBuffer;
use crate::widget::{MotionEvent, Widget, WidgetBase};

/// Container widget composing its children
///
/// Children are drawn in insertion order, so later children cover earlier
/// ones where they overlap.
pub struct Layout {
    base: WidgetBase,
    children: Vec<Box<dyn Widget>>,
    canvas: PixelBuffer,
}

impl Layout {
    /// Create an empty container of the given size at the origin
    pub fn new(width: u16, height: u16) -> Self {
        let mut layout = Self {
            base: WidgetBase::new("layout"),
            children: Vec::new(),
            canvas: PixelBuffer::new(width, height),
        };
        layout.set_size(width, height);
        layout
    }

    /// Create an empty container covering the whole panel
    pub fn full_screen() -> Self {
        Self::new(PANEL_WIDTH, PANEL_HEIGHT)
    }

    /// Add a child on top of the existing ones
    pub fn add_child(&mut self, child: Box<dyn Widget>) {
        log::trace!("layout {} gains child {}", self.base.name(), child.name());
        self.children.push(child);
    }

    /// Remove and return the first child called `name`
    pub fn remove_child(&mut self, name: &str) -> Option<Box<dyn Widget>> {
        let index = self.children.iter().position(|c| c.name() == name)?;
        Some(self.children.remove(index))
    }

    /// First child called `name`
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Box<dyn Widget>> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the container has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Widget for Layout {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    /// Compose every visible child into the container buffer
    fn matrix(&mut self) -> Option<&PixelBuffer> {
        self.canvas.clear();
        self.canvas
            .set_anchor(self.base.x() as i32, self.base.y() as i32);
        for child in self.children.iter_mut().filter(|c| c.is_visible()) {
            if let Some(rendered) = child.matrix() {
                self.canvas.merge(rendered);
            }
        }
        Some(&self.canvas)
    }

    fn geometry_changed(&mut self) {
        let (width, height) = (self.base.width(), self.base.height());
        if width != self.canvas.width() || height != self.canvas.height() {
            self.canvas = PixelBuffer::new(width, height);
        }
    }

    /// Offer the event to visible children in insertion order
    ///
    /// Stops at the first child whose listener takes it.
    fn dispatch_touch_event(&mut self, event: &MotionEvent) -> bool {
        for child in self.children.iter_mut().filter(|c| c.is_visible()) {
            if child.dispatch_touch_event(event) {
                return true;
            }
        }
        self.on_touch(event);
        false
    }
}

impl core::fmt::Debug for Layout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Layout")
            .field("base", &self.base)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}
