use std::{any::Any, fs::OpenOptions, io, panic, path::Path, sync::Mutex, thread};

use thiserror::Error;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot open log file: {0}")]
    File(#[from] io::Error),
    #[error("Cannot install log subscriber: {0}")]
    Subscriber(String),
}

/// Routes tracing output to `path`, since the terminal belongs to the UI.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging(path: &Path) -> Result<(), LoggingError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))
}

/// Text of a `panic!` payload, if it carries one.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        Some(message.to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

/// Sends panic reports to the log instead of stderr.
///
/// The default hook writes over the terminal UI. The payload is untouched,
/// so a joined thread still hands it back.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload()).unwrap_or_else(|| "Box<dyn Any>".to_string());
        let current = thread::current();
        let thread = current.name().unwrap_or("<unnamed>");
        match info.location() {
            Some(location) => error!(thread, %location, "panic: {message}"),
            None => error!(thread, "panic: {message}"),
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("no-such-dir").join("app.log");
        assert!(matches!(init_logging(&missing), Err(LoggingError::File(_))));

        let path = dir.path().join("app.log");
        init_logging(&path).unwrap();
        assert!(path.exists());

        tracing::info!("written to file");
        assert!(matches!(init_logging(&path), Err(LoggingError::Subscriber(_))));
    }

    #[test]
    fn test_panic_message_payloads() {
        let literal: Box<dyn Any + Send> = Box::new("static text");
        let formatted: Box<dyn Any + Send> = Box::new(format!("code {}", 7));
        let other: Box<dyn Any + Send> = Box::new(42u8);

        assert_eq!(panic_message(&*literal).as_deref(), Some("static text"));
        assert_eq!(panic_message(&*formatted).as_deref(), Some("code 7"));
        assert_eq!(panic_message(&*other), None);
    }

    #[test]
    fn test_panic_hook_keeps_payload_for_join() {
        let previous = panic::take_hook();
        install_panic_hook();

        let result = thread::Builder::new()
            .name("hooked".to_string())
            .spawn(|| panic!("hooked failure"))
            .unwrap()
            .join();

        // Put the test harness hook back before asserting.
        let _ = panic::take_hook();
        panic::set_hook(previous);

        let payload = result.unwrap_err();
        assert_eq!(panic_message(&*payload).as_deref(), Some("hooked failure"));
    }
}
