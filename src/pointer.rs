//! OS cursor backend for X11 systems.
//!
//! The control mapper issues cursor commands through the [`PointerDevice`]
//! trait; the X11 implementation warps the pointer with core protocol
//! requests and injects button events through the XTEST extension.

use crate::error::{Error, Result};
use log::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, Screen, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT};
use x11rb::protocol::xtest::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;
use x11rb::CURRENT_TIME;

/// Left mouse button detail code
const LEFT_BUTTON: u8 = 1;

/// Cursor commands issued by the control mapper
pub trait PointerDevice {
    /// Screen dimensions in pixels
    fn screen_size(&self) -> (u16, u16);

    /// Absolute cursor move, clamped to the screen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorControl`] if the backend rejects the move
    fn move_to(&mut self, x: i16, y: i16) -> Result<()>;

    /// Single left-button click.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorControl`] if the backend rejects the event
    fn click(&mut self) -> Result<()>;
}

/// Cursor control implementation for X11
pub struct X11Pointer {
    connection: RustConnection,
    screen: Screen,
    screen_width: u16,
    screen_height: u16,
}

impl X11Pointer {
    /// Connect to the X11 display and read the screen geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorControl`] if no display is reachable
    pub fn new() -> Result<Self> {
        info!("Initializing X11 pointer backend");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::CursorControl(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::CursorControl("Failed to get screen".to_string()))?
            .clone();

        let screen_width = screen.width_in_pixels;
        let screen_height = screen.height_in_pixels;
        info!("Connected to X11 display, screen: {screen_width}x{screen_height}");

        Ok(Self {
            connection,
            screen,
            screen_width,
            screen_height,
        })
    }
}

impl PointerDevice for X11Pointer {
    fn screen_size(&self) -> (u16, u16) {
        (self.screen_width, self.screen_height)
    }

    fn move_to(&mut self, x: i16, y: i16) -> Result<()> {
        let max_x = i16::try_from(self.screen_width.saturating_sub(1)).unwrap_or(i16::MAX);
        let max_y = i16::try_from(self.screen_height.saturating_sub(1)).unwrap_or(i16::MAX);
        let x = x.clamp(0, max_x);
        let y = y.clamp(0, max_y);

        debug!("Moving cursor to ({x}, {y})");

        self.connection
            .warp_pointer(x11rb::NONE, self.screen.root, 0, 0, 0, 0, x, y)
            .map_err(|e| Error::CursorControl(format!("Failed to warp pointer: {e}")))?;
        self.connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))?;
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        debug!("Injecting left button click");

        self.connection
            .xtest_fake_input(BUTTON_PRESS_EVENT, LEFT_BUTTON, CURRENT_TIME, self.screen.root, 0, 0, 0)
            .map_err(|e| Error::CursorControl(format!("Failed to press button: {e}")))?;
        self.connection
            .xtest_fake_input(
                BUTTON_RELEASE_EVENT,
                LEFT_BUTTON,
                CURRENT_TIME,
                self.screen.root,
                0,
                0,
                0,
            )
            .map_err(|e| Error::CursorControl(format!("Failed to release button: {e}")))?;
        self.connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))?;
        Ok(())
    }
}
