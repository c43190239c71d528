//! Text widget
//!
//! [`Text`] lays a string out glyph by glyph into a widget-sized
//! [`PixelBuffer`], wrapping at the right edge and at newlines, with an
//! optional border. The render is cached until the text, alignment, border
//! or geometry changes. [`Text::add_text`] extends a cached left-aligned
//! render in place instead of laying everything out again.
//!
//! Glyphs come from a [`GlyphSource`]. Each glyph is a buffer 8 pixels high
//! and as wide as the character needs; lines are [`LINE_OFFSET`] pixels apart.
//!
//! ## Example
//!
//! ```
//! use mui_panel::text::{GlyphSource, Text};
//! use mui_panel::widget::Widget;
//! use mui_panel::PixelBuffer;
//!
//! struct Blocks;
//! impl GlyphSource for Blocks {
//!     fn glyph(&self, _c: char) -> PixelBuffer {
//!         let mut glyph = PixelBuffer::new(8, 8);
//!         glyph.set(0, 0, true);
//!         glyph
//!     }
//! }
//!
//! let mut text = Text::new(Blocks).with_text("AB");
//! text.set_bounds(0, 0, 100, 8);
//! let rendered = text.matrix().map(|m| (m.get(0, 0), m.get(8, 0)));
//! assert_eq!(rendered, Some((true, true)));
//! ```

use std::rc::Rc;

use crate::matrix::PixelBuffer;
use crate::widget::{Widget, WidgetBase};

/// Height of every glyph
pub const GLYPH_HEIGHT: i32 = 8;

/// Distance between the tops of consecutive lines
pub const LINE_OFFSET: i32 = GLYPH_HEIGHT + 3;

/// Margin kept inside an [`Border::Around`] frame
const AROUND_MARGIN: i32 = 2;

/// Font lookup
pub trait GlyphSource {
    /// Bitmap for `c`, anchored at the origin
    fn glyph(&self, c: char) -> PixelBuffer;
}

impl<G: GlyphSource + ?Sized> GlyphSource for &G {
    fn glyph(&self, c: char) -> PixelBuffer {
        (**self).glyph(c)
    }
}

impl<G: GlyphSource + ?Sized> GlyphSource for Rc<G> {
    fn glyph(&self, c: char) -> PixelBuffer {
        (**self).glyph(c)
    }
}

/// Horizontal placement of the text inside the widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlignment {
    /// Flush left
    #[default]
    Left,
    /// Centered both horizontally and vertically
    Center,
    /// Flush right
    Right,
}

/// Decoration drawn around the text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Border {
    /// No border
    #[default]
    None,
    /// Underline below the last line; needs one extra pixel of height
    Bottom,
    /// Rectangle around the text; needs 4 extra pixels each way
    Around,
}

/// Where the next glyph goes, in widget-local pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor {
    x: i32,
    y: i32,
    /// Line start restored after a newline
    origin_x: i32,
}

type OverflowHook = Box<dyn FnMut(usize)>;

/// One layout pass over some characters
///
/// Reports overflow at most once for the whole pass.
struct Pass<'a, G> {
    glyphs: &'a G,
    width: i32,
    height: i32,
    cursor: Cursor,
    max_x: i32,
    overflowed: bool,
    hook: &'a mut Option<OverflowHook>,
}

impl<G: GlyphSource> Pass<'_, G> {
    fn overflow(&mut self, index: usize) {
        if self.overflowed {
            return;
        }
        self.overflowed = true;
        log::debug!("text overflows its widget at character {}", index);
        if let Some(hook) = self.hook.as_mut() {
            hook(index);
        }
    }

    fn line_fits(&self) -> bool {
        self.cursor.y + GLYPH_HEIGHT <= self.height
    }

    fn new_line(&mut self, x: i32, index: usize) {
        self.cursor.x = x;
        self.cursor.y += LINE_OFFSET;
        if !self.line_fits() {
            self.overflow(index);
        }
    }

    /// Lay out `text` into `out`, numbering characters from `first_index`
    fn run(&mut self, text: &str, first_index: usize, out: &mut PixelBuffer) {
        for (index, c) in (first_index..).zip(text.chars()) {
            if c == '\n' {
                self.new_line(self.cursor.origin_x, index);
                continue;
            }

            // no room for another glyph on this line nor for another line
            if self.cursor.x + GLYPH_HEIGHT > self.width
                && self.cursor.y + LINE_OFFSET > self.height
            {
                self.overflow(index);
            }

            let mut glyph = self.glyphs.glyph(c);
            let glyph_width = glyph.width() as i32;
            if self.cursor.x > 0 && self.cursor.x + glyph_width > self.width {
                self.new_line(0, index);
            }

            glyph.set_anchor(self.cursor.x, self.cursor.y);
            out.merge(&glyph);
            self.cursor.x += glyph_width;
            self.max_x = self.max_x.max(self.cursor.x);
        }
    }
}

/// Text widget
///
/// Call [`matrix`](Widget::matrix) to render. Without any text set there is
/// nothing to draw and `matrix` returns `None`.
pub struct Text<G> {
    base: WidgetBase,
    glyphs: G,
    text: Option<String>,
    alignment: TextAlignment,
    border: Border,
    cache: Option<PixelBuffer>,
    cursor: Cursor,
    dirty: bool,
    /// Index of the next character an append will lay out
    next_index: usize,
    draw_out_area: bool,
    overflow_hook: Option<OverflowHook>,
}

impl<G: GlyphSource> Text<G> {
    /// Create an empty text widget drawing with `glyphs`
    pub fn new(glyphs: G) -> Self {
        Self {
            base: WidgetBase::new("text"),
            glyphs,
            text: None,
            alignment: TextAlignment::Left,
            border: Border::None,
            cache: None,
            cursor: Cursor::default(),
            dirty: true,
            next_index: 0,
            draw_out_area: false,
            overflow_hook: None,
        }
    }

    /// Set the initial text
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Set the initial border
    pub fn with_border(mut self, border: Border) -> Self {
        self.set_border(border);
        self
    }

    /// Current text, if any has been set
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Current alignment
    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Current border
    pub fn border(&self) -> Border {
        self.border
    }

    /// Replace the text; the next render lays everything out again
    pub fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_owned());
        self.invalidate();
    }

    /// Replace the text and the alignment together
    pub fn set_text_with_alignment(&mut self, text: &str, alignment: TextAlignment) {
        self.alignment = alignment;
        self.set_text(text);
    }

    /// Change the alignment
    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
        self.invalidate();
    }

    /// Change the border
    pub fn set_border(&mut self, border: Border) {
        self.border = border;
        self.invalidate();
    }

    /// Size the output to the measured text height instead of the widget height
    pub fn set_draw_out_area(&mut self, enabled: bool) {
        self.draw_out_area = enabled;
        self.invalidate();
    }

    /// Register the overflow hook
    ///
    /// Called with the index of the character at which the text no longer
    /// fits, at most once per layout pass. The render itself is not clipped.
    pub fn on_overflow(&mut self, hook: impl FnMut(usize) + 'static) {
        self.overflow_hook = Some(Box::new(hook));
    }

    /// Append `fragment` to the text
    ///
    /// A clean, left-aligned, borderless render is extended from where the
    /// last glyph ended, laying out only the new characters.
    ///
    /// Centered or right-aligned text, bordered text and text sized with
    /// [`set_draw_out_area`](Self::set_draw_out_area) depend on the measured
    /// size of the whole string, so appending to them marks the widget dirty
    /// and the next render lays every character out again.
    pub fn add_text(&mut self, fragment: &str) {
        self.text.get_or_insert_with(String::new).push_str(fragment);

        let incremental = !self.dirty
            && self.alignment == TextAlignment::Left
            && self.border == Border::None
            && !self.draw_out_area;
        let Some(mut cache) = self.cache.take().filter(|_| incremental) else {
            self.dirty = true;
            return;
        };

        cache.set_anchor(0, 0);
        let mut pass = Pass {
            glyphs: &self.glyphs,
            width: self.base.width() as i32,
            height: self.base.height() as i32,
            cursor: self.cursor,
            max_x: 0,
            overflowed: false,
            hook: &mut self.overflow_hook,
        };
        pass.run(fragment, self.next_index, &mut cache);
        self.cursor = pass.cursor;
        self.next_index += fragment.chars().count();
        self.cache = Some(cache);
    }

    /// Drop the last character and lay out again
    pub fn delete_last_char(&mut self) {
        let Some(mut text) = self.text.take() else {
            return;
        };
        text.pop();
        self.set_text(&text);
    }

    /// Widest line `text` produces in this widget
    pub fn measure_width(&self, text: &str) -> u16 {
        let width = self.base.width() as i32;
        let mut line = 0i32;
        let mut widest = 0i32;
        for c in text.chars() {
            if c == '\n' {
                line = 0;
                continue;
            }
            let glyph_width = self.glyphs.glyph(c).width() as i32;
            if line > 0 && line + glyph_width > width {
                line = 0;
            }
            line += glyph_width;
            widest = widest.max(line);
        }
        widest as u16
    }

    /// Height `text` occupies in this widget, including wrapped lines
    pub fn measure_height(&self, text: &str) -> u16 {
        let width = self.base.width() as i32;
        let mut line = 0i32;
        let mut height = GLYPH_HEIGHT;
        for c in text.chars() {
            if c == '\n' {
                height += LINE_OFFSET;
                line = 0;
                continue;
            }
            let glyph_width = self.glyphs.glyph(c).width() as i32;
            if line > 0 && line + glyph_width > width {
                height += LINE_OFFSET;
                line = 0;
            }
            line += glyph_width;
        }
        height as u16
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        self.cache = None;
        self.cursor = Cursor::default();
        self.next_index = 0;
    }

    /// Where the first line starts for the current alignment and border
    fn start_cursor(&self, text: &str, text_height: u16) -> Cursor {
        let width = self.base.width() as i32;
        let height = self.base.height() as i32;
        let around = i32::from(self.border == Border::Around);

        let (x, y) = match self.alignment {
            TextAlignment::Left => (AROUND_MARGIN * around, AROUND_MARGIN * around),
            TextAlignment::Center => {
                let dx = width - self.measure_width(text) as i32;
                let dy = height - text_height as i32;
                (dx.div_euclid(2) + around, dy.div_euclid(2))
            }
            TextAlignment::Right => {
                let dx = width - self.measure_width(text) as i32;
                (dx - around, AROUND_MARGIN * around)
            }
        };
        Cursor { x, y, origin_x: x }
    }

    fn draw_border(&self, out: &mut PixelBuffer, cursor: Cursor, max_x: i32) {
        match self.border {
            Border::None => {}
            Border::Bottom => {
                if out.height() as i32 > GLYPH_HEIGHT {
                    let y = cursor.y + GLYPH_HEIGHT;
                    for x in 0..max_x {
                        out.set(x, y, true);
                    }
                }
            }
            Border::Around => {
                let right = if self.alignment == TextAlignment::Center {
                    self.base.width() as i32
                } else {
                    max_x + 2
                };
                let bottom = self.base.height() as i32 - 1;
                for x in 0..right {
                    out.set(x, 0, true);
                    out.set(x, bottom, true);
                }
                for y in 0..bottom {
                    out.set(0, y, true);
                    out.set(right - 1, y, true);
                }
            }
        }
    }

    /// Full layout pass into a fresh buffer
    fn render(&mut self) {
        let text = self.text.clone().unwrap_or_default();
        let text_height = self.measure_height(&text);
        let start = self.start_cursor(&text, text_height);
        let out_height = if self.draw_out_area {
            text_height
        } else {
            self.base.height()
        };

        let mut out = PixelBuffer::new(self.base.width(), out_height);
        let mut pass = Pass {
            glyphs: &self.glyphs,
            width: self.base.width() as i32,
            height: self.base.height() as i32,
            cursor: start,
            max_x: 0,
            overflowed: false,
            hook: &mut self.overflow_hook,
        };
        pass.run(&text, 0, &mut out);
        let (cursor, max_x) = (pass.cursor, pass.max_x);

        self.draw_border(&mut out, cursor, max_x);
        log::trace!("laid out {} characters of text", text.chars().count());

        self.cursor = cursor;
        self.next_index = text.chars().count();
        self.cache = Some(out);
        self.dirty = false;
    }
}

impl<G: GlyphSource> Widget for Text<G> {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn matrix(&mut self) -> Option<&PixelBuffer> {
        self.text.as_ref()?;
        if self.dirty || self.cache.is_none() {
            self.render();
        }
        let (x, y) = (self.base.x() as i32, self.base.y() as i32);
        let cache = self.cache.as_mut()?;
        cache.set_anchor(x, y);
        Some(&*cache)
    }

    fn geometry_changed(&mut self) {
        self.invalidate();
    }
}

impl<G> core::fmt::Debug for Text<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Text")
            .field("base", &self.base)
            .field("text", &self.text)
            .field("alignment", &self.alignment)
            .field("border", &self.border)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Fixed-width font that counts lookups; every glyph has its top-left pixel set
    #[derive(Debug, Default)]
    pub(crate) struct CountingFont {
        pub(crate) width: u16,
        pub(crate) lookups: Cell<usize>,
    }

    impl CountingFont {
        pub(crate) fn new(width: u16) -> Self {
            Self {
                width,
                lookups: Cell::new(0),
            }
        }
    }

    impl GlyphSource for CountingFont {
        fn glyph(&self, _c: char) -> PixelBuffer {
            self.lookups.set(self.lookups.get() + 1);
            let mut glyph = PixelBuffer::new(self.width, 8);
            glyph.set(0, 0, true);
            glyph
        }
    }

    fn text_widget(font: &CountingFont, width: u16, height: u16) -> Text<&CountingFont> {
        let mut text = Text::new(font);
        text.set_bounds(0, 0, width, height);
        text
    }

    #[test]
    fn test_no_text_renders_nothing() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        assert!(text.matrix().is_none());
        assert_eq!(font.lookups.get(), 0);
    }

    #[test]
    fn test_left_aligned_glyph_positions() {
        let font = CountingFont::new(6);
        let mut text = text_widget(&font, 100, 8);
        text.set_text("abc");
        let m = text.matrix().unwrap();
        assert!(m.get(0, 0));
        assert!(m.get(6, 0));
        assert!(m.get(12, 0));
        assert!(!m.get(18, 0));
    }

    #[test]
    fn test_newline_returns_to_line_origin() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 22);
        text.set_text("a\nb");
        let m = text.matrix().unwrap();
        assert!(m.get(0, 0));
        assert!(m.get(0, LINE_OFFSET));
    }

    #[test]
    fn test_wrap_at_right_edge() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 16, 19);
        text.set_text("ABC");
        let m = text.matrix().unwrap();
        assert!(m.get(0, 0));
        assert!(m.get(8, 0));
        assert!(m.get(0, LINE_OFFSET));
        assert_eq!(text.measure_height("ABC"), 19);
        assert_eq!(text.measure_width("ABC"), 16);
    }

    #[test]
    fn test_cache_reused_until_mutated() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        text.set_text("hi");
        text.matrix();
        let after_first = font.lookups.get();

        text.matrix();
        assert_eq!(font.lookups.get(), after_first);

        text.set_border(Border::Bottom);
        text.matrix();
        assert!(font.lookups.get() > after_first);

        let after_border = font.lookups.get();
        text.set_text_alignment(TextAlignment::Right);
        text.matrix();
        assert!(font.lookups.get() > after_border);
    }

    #[test]
    fn test_cached_render_follows_position() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        text.set_text("a");
        text.matrix();
        text.set_position(40, 3);
        let m = text.matrix().unwrap();
        assert_eq!((m.anchor_x(), m.anchor_y()), (40, 3));
    }

    #[test]
    fn test_add_text_lays_out_only_new_characters() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        text.set_text("ab");
        text.matrix();
        let before = font.lookups.get();

        text.add_text("c");
        assert_eq!(font.lookups.get(), before + 1);
        assert_eq!(text.text(), Some("abc"));

        let m = text.matrix().unwrap();
        assert!(m.get(16, 0));
        assert_eq!(font.lookups.get(), before + 1);
    }

    #[test]
    fn test_add_text_on_aligned_text_relays_out() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        text.set_text_with_alignment("ab", TextAlignment::Right);
        text.matrix();
        text.add_text("c");
        let m = text.matrix().unwrap();
        // right aligned: 100 - 24
        assert!(m.get(76, 0));
        assert!(m.get(92, 0));
    }

    #[test]
    fn test_add_text_without_text_starts_fresh() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        text.add_text("x");
        assert_eq!(text.text(), Some("x"));
        assert!(text.matrix().unwrap().get(0, 0));
    }

    #[test]
    fn test_delete_last_char() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        text.delete_last_char();
        assert_eq!(text.text(), None);

        text.set_text("ab");
        text.matrix();
        text.delete_last_char();
        assert_eq!(text.text(), Some("a"));
        let m = text.matrix().unwrap();
        assert!(!m.get(8, 0));
    }

    #[test]
    fn test_center_alignment() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 40, 20);
        text.set_text_with_alignment("ab", TextAlignment::Center);
        let m = text.matrix().unwrap();
        // (40 - 16) / 2 = 12, (20 - 8) / 2 = 6
        assert!(m.get(12, 6));
        assert!(m.get(20, 6));
    }

    #[test]
    fn test_bottom_border_under_text() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 9);
        text.set_text("ab");
        text.set_border(Border::Bottom);
        let m = text.matrix().unwrap();
        assert!(m.get(0, 8));
        assert!(m.get(15, 8));
        assert!(!m.get(16, 8));
    }

    #[test]
    fn test_bottom_border_needs_extra_row() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8).with_border(Border::Bottom);
        text.set_text("ab");
        let m = text.matrix().unwrap();
        assert!(m.rows().nth(7).unwrap().iter().all(|&on| !on));
    }

    #[test]
    fn test_around_border() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 40, 12).with_border(Border::Around);
        text.set_text("a");
        let m = text.matrix().unwrap();
        // glyph inside the margin
        assert!(m.get(2, 2));
        // frame right edge at max_x + 2 - 1 = 11
        assert!(m.get(0, 0));
        assert!(m.get(11, 0));
        assert!(m.get(11, 11));
        assert!(m.get(0, 11));
        assert!(m.get(11, 5));
        assert!(!m.get(12, 0));
    }

    #[test]
    fn test_around_border_right_aligned() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 40, 12).with_border(Border::Around);
        text.set_text_with_alignment("a", TextAlignment::Right);
        let m = text.matrix().unwrap();
        // 40 - 8 - 1
        assert!(m.get(31, 2));
        assert!(!m.get(30, 2));
        assert!(!m.get(32, 2));
        assert!(m.get(0, 5));
    }

    #[test]
    fn test_around_border_centered_spans_width() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 40, 12).with_border(Border::Around);
        text.set_text_with_alignment("a", TextAlignment::Center);
        let m = text.matrix().unwrap();
        // (40 - 8) / 2 + 1, (12 - 8) / 2
        assert!(m.get(17, 2));
        assert!(!m.get(16, 2));
        // frame closes at the widget's right edge
        assert!(m.get(39, 0));
        assert!(m.get(39, 5));
        assert!(m.get(39, 11));
        assert!(m.get(0, 5));
        assert!(!m.get(38, 5));
    }

    #[test]
    fn test_draw_out_area_sizes_to_text() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 16, 8);
        text.set_draw_out_area(true);
        text.set_text("ABC");
        let m = text.matrix().unwrap();
        assert_eq!(m.height(), 19);
        assert!(m.get(0, LINE_OFFSET));
    }

    #[test]
    fn test_overflow_reported_once_per_pass() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 16, 8);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        text.on_overflow(move |index| sink.borrow_mut().push(index));

        text.set_text("ABCD");
        text.matrix();
        assert_eq!(*seen.borrow(), vec![2]);

        // cached render, no new pass
        text.matrix();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_overflow_on_newline() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        text.on_overflow(move |index| sink.borrow_mut().push(index));

        text.set_text("ab\nc");
        text.matrix();
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_text_that_fits_never_overflows() {
        let font = CountingFont::new(8);
        let mut text = text_widget(&font, 100, 8);
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        text.on_overflow(move |_| sink.set(sink.get() + 1));
        text.set_text("abc");
        text.matrix();
        assert_eq!(hits.get(), 0);
    }
}
