//! Line emission to the serial link and the optional storage mirror.

use embedded_io_async::{ErrorType, Write};

use crate::config::{LINE_TERMINATOR, LOG_OPEN_FAILED_LINE, LOG_WRITE_FAILED_LINE};

/// Stand-in secondary sink for builds without storage logging.
///
/// Uninhabited, so an `Emitter<_, NoSecondary>` can never hold one.
pub enum NoSecondary {}

impl ErrorType for NoSecondary {
    type Error = core::convert::Infallible;
}

impl Write for NoSecondary {
    async fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        match *self {}
    }
}

/// Writes every line to the primary sink and mirrors it to the secondary one
/// when that is attached, flushing the mirror after each line.
pub struct Emitter<P, S = NoSecondary> {
    primary: P,
    secondary: Option<S>,
    primary_errors: u32,
}

impl<P: Write> Emitter<P, NoSecondary> {
    pub fn serial_only(primary: P) -> Self {
        Self::new(primary, None)
    }
}

impl<P: Write, S: Write> Emitter<P, S> {
    pub fn new(primary: P, secondary: Option<S>) -> Self {
        Self {
            primary,
            secondary,
            primary_errors: 0,
        }
    }

    /// Attaches the result of opening the secondary sink.
    ///
    /// A failed open is reported once on the primary sink and the emitter keeps
    /// going serial-only.
    pub async fn attach_secondary<E>(&mut self, opened: Result<S, E>) {
        match opened {
            Ok(sink) => {
                info!("secondary sink attached");
                self.secondary = Some(sink);
            }
            Err(_) => {
                warn!("secondary sink unavailable, continuing serial-only");
                self.secondary = None;
                self.diagnostic(LOG_OPEN_FAILED_LINE).await;
            }
        }
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Writes `line` to both sinks.
    pub async fn emit(&mut self, line: &str) {
        self.write_primary(line).await;

        let Some(secondary) = self.secondary.as_mut() else {
            return;
        };
        let mirrored = async {
            secondary.write_all(line.as_bytes()).await?;
            secondary.write_all(LINE_TERMINATOR).await?;
            secondary.flush().await
        }
        .await;

        if mirrored.is_err() {
            error!("secondary sink write failed, dropping it");
            self.secondary = None;
            self.diagnostic(LOG_WRITE_FAILED_LINE).await;
        }
    }

    /// Writes `line` to the primary sink only.
    pub async fn diagnostic(&mut self, line: &str) {
        self.write_primary(line).await;
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn primary_errors(&self) -> u32 {
        self.primary_errors
    }

    pub fn into_parts(self) -> (P, Option<S>) {
        (self.primary, self.secondary)
    }

    async fn write_primary(&mut self, line: &str) {
        let written = async {
            self.primary.write_all(line.as_bytes()).await?;
            self.primary.write_all(LINE_TERMINATOR).await
        }
        .await;
        if written.is_err() {
            self.primary_errors = self.primary_errors.wrapping_add(1);
            if self.primary_errors == 1 {
                warn!("serial write failed");
            }
        }
    }
}
