//! Core display operations
//!
//! [`Display`] keeps two panel-sized buffers: the layout the application is
//! building (`current`) and the layout the panel is known to show
//! (`last_sent`). [`Display::update_layout`] sends only the byte-aligned
//! bounding box of the pixels that differ between them.

use embedded_hal::delay::DelayNs;

use crate::command::{DisplayMode, PANEL_HEIGHT, PANEL_WIDTH};
use crate::config::Config;
use crate::error::Error;
use crate::frame::{self, Response};
use crate::interface::DisplayInterface;
use crate::matrix::PixelBuffer;

type DisplayResult<I, T = ()> = core::result::Result<T, Error<I>>;

/// Duty used when powering on and when clearing
pub const FULL_DUTY: u8 = 100;

/// Core display driver for the 200x32 panel
///
/// All operations block until the panel has answered.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Link to the controller
    interface: I,
    /// Link configuration
    config: Config,
    /// Layout being built by the application
    current: PixelBuffer,
    /// Layout the panel currently shows
    last_sent: PixelBuffer,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// Both buffers start blank, matching a freshly reset panel.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            current: PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT),
            last_sent: PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT),
        }
    }

    /// Reset the controller and discard anything left on the link
    ///
    /// Must run once before any other operation.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("resetting panel controller");
        self.interface.reset(delay).map_err(Error::Interface)?;
        self.interface.clear_input().map_err(Error::Interface)
    }

    /// Light the panel
    pub fn turn_on<D: DelayNs>(&mut self, fade: u8, delay: &mut D) -> DisplayResult<I> {
        self.send_request(DisplayMode::On, fade, FULL_DUTY, delay)
    }

    /// Blank the panel
    pub fn turn_off<D: DelayNs>(&mut self, fade: u8, delay: &mut D) -> DisplayResult<I> {
        self.send_request(DisplayMode::Off, fade, 0, delay)
    }

    /// Re-latch the panel with a new fade and duty
    pub fn refresh<D: DelayNs>(&mut self, fade: u8, duty: u8, delay: &mut D) -> DisplayResult<I> {
        self.send_request(DisplayMode::Refresh, fade, duty, delay)
    }

    /// Replace the pending layout with `layout`
    ///
    /// Only pixel values are copied; nothing is sent until
    /// [`update_layout`](Self::update_layout).
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` unless `layout` is panel-sized.
    pub fn set_layout(&mut self, layout: &PixelBuffer) -> DisplayResult<I> {
        if !self.current.same_size(layout) {
            return Err(Error::DimensionMismatch {
                expected: (PANEL_WIDTH, PANEL_HEIGHT),
                provided: (layout.width(), layout.height()),
            });
        }
        self.current.copy_from(layout);
        Ok(())
    }

    /// The pending layout
    pub fn layout(&self) -> &PixelBuffer {
        &self.current
    }

    /// The pending layout, for drawing into directly
    pub fn layout_mut(&mut self) -> &mut PixelBuffer {
        &mut self.current
    }

    /// The layout the panel is known to show
    pub fn last_sent(&self) -> &PixelBuffer {
        &self.last_sent
    }

    /// Send the pixels that changed since the last successful update
    ///
    /// Returns `Ok(false)` without touching the link when nothing changed.
    /// The known panel state only advances once the controller has replied.
    pub fn update_layout<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I, bool> {
        let Some(diff) = crate::diff::diff_region(&self.last_sent, &self.current) else {
            log::debug!("layout unchanged, nothing to send");
            return Ok(false);
        };

        let region = diff.aligned(PANEL_WIDTH, PANEL_HEIGHT);
        log::debug!("changed area {:?} sent as {:?}", diff, region);

        let packet = frame::partial_layout(&self.current, region);
        self.transact(&packet, delay)?;
        self.last_sent.copy_from(&self.current);
        Ok(true)
    }

    /// Send the whole layout regardless of what the panel shows, then refresh
    ///
    /// Used for the first draw and to recover from an unknown panel state.
    pub fn force_full_update<D: DelayNs>(
        &mut self,
        fade: u8,
        duty: u8,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let packet = frame::full_layout(&self.current);
        log::debug!("sending full layout ({} bytes)", packet.len());
        self.transact(&packet, delay)?;
        self.refresh(fade, duty, delay)?;
        self.last_sent.copy_from(&self.current);
        Ok(())
    }

    /// Blank the layout and push it to the panel
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.current = PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT);
        self.force_full_update(0, FULL_DUTY, delay)
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Consume the display and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn send_request<D: DelayNs>(
        &mut self,
        mode: DisplayMode,
        fade: u8,
        duty: u8,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let packet = frame::display_request(mode, fade, duty);
        self.transact(&packet, delay)
    }

    /// Send one frame and wait for the controller's fixed-size reply
    fn transact<D: DelayNs>(&mut self, packet: &[u8], delay: &mut D) -> DisplayResult<I> {
        let mut reply = vec![0u8; self.config.response_len];
        self.interface
            .exchange(packet, &mut reply, delay)
            .map_err(Error::Interface)?;

        match Response::parse(&reply) {
            Response::Ack => {}
            Response::Nack => log::warn!("panel rejected frame: {:02X?}", reply),
            Response::Unknown => log::warn!("unrecognised panel reply: {:02X?}", reply),
        }
        Ok(())
    }
}
