use core::fmt::{Debug, Display, Write};

use heapless::String;

use crate::codec::FrameError;
use crate::reading::Invalid;

/// Longest error message kept by an [`ErrorChannel`]; longer ones are cut.
pub const MAX_MESSAGE: usize = 64;

/// Latched error description.
pub type Message = String<MAX_MESSAGE>;

/// A failed transaction.
#[derive(Debug, thiserror::Error)]
pub enum Error<E: Debug> {
    /// An I<sup>2</sup>C error occurred while writing a command.
    #[error("I²C write error: {0:?}")]
    Write(E),
    /// An I<sup>2</sup>C error occurred while reading a response.
    #[error("I²C read error: {0:?}")]
    Read(E),
    /// A word of the response failed its checksum.
    #[error("checksum mismatch in word {word}")]
    Checksum { word: usize },
    /// The response had an unexpected length.
    #[error("malformed response of {0} bytes")]
    Length(usize),
}

impl<E: Debug> From<FrameError> for Error<E> {
    fn from(error: FrameError) -> Self {
        match error {
            FrameError::Checksum { word } => Self::Checksum { word },
            FrameError::Length(len) => Self::Length(len),
        }
    }
}

impl<E: Debug> Error<E> {
    /// How a reading affected by this error is reported.
    pub fn reason(&self) -> Invalid {
        match self {
            Self::Write(_) | Self::Read(_) => Invalid::Transport,
            Self::Checksum { .. } | Self::Length(_) => Invalid::Checksum,
        }
    }
}

/// Last transaction failure plus the single callback told about it.
///
/// The handler never sees the failure itself, only the message latched for
/// it, read back at the moment the driver decides to notify.
pub struct ErrorChannel<H> {
    last: Option<Message>,
    handler: Option<H>,
}

impl<H> ErrorChannel<H> {
    pub const fn new() -> Self {
        Self {
            last: None,
            handler: None,
        }
    }

    /// Registers `handler`, or clears the slot with `None`. Returns the
    /// handler it replaced.
    pub fn set_handler(&mut self, handler: Option<H>) -> Option<H> {
        core::mem::replace(&mut self.handler, handler)
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// The most recently latched error description.
    pub fn last_error(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Moves the latched error over to a channel holding `handler`.
    pub(crate) fn with_handler<H2>(self, handler: H2) -> ErrorChannel<H2> {
        ErrorChannel {
            last: self.last,
            handler: Some(handler),
        }
    }

    pub(crate) fn latch(&mut self, error: &impl Display) {
        let mut message = Message::new();
        // Truncating never fails
        let _ = write!(
            Truncating {
                message: &mut message,
                full: false,
            },
            "{error}"
        );
        self.last = Some(message);
    }
}

impl<H> ErrorChannel<H>
where
    H: FnMut(&str),
{
    /// Hands the latched message to the handler, if both are present.
    pub(crate) fn notify(&mut self) {
        if let (Some(handler), Some(message)) = (self.handler.as_mut(), self.last.as_deref()) {
            handler(message);
        }
    }
}

/// Writes into a [`Message`] until it is full and drops the rest.
struct Truncating<'a> {
    message: &'a mut Message,
    full: bool,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.full || self.message.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

impl<H> Default for ErrorChannel<H> {
    fn default() -> Self {
        Self::new()
    }
}
