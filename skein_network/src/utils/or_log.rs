use std::fmt::{Debug, Display};

/// Log, rather than propagate, the error from an operation whose failure
/// shouldn't stop the caller
pub trait OrLog {
    fn or_log(&self, context: impl Display);

    /// As [`or_log`](Self::or_log), but at warning level, for failures that
    /// come from what the network sent rather than from our own state
    fn or_warn(&self, context: impl Display);
}

impl<T, E: Debug> OrLog for Result<T, E> {
    fn or_log(&self, context: impl Display) {
        if let Err(e) = &self {
            tracing::error!("Error: {:?} ({})", e, context);
        }
    }

    fn or_warn(&self, context: impl Display) {
        if let Err(e) = &self {
            tracing::warn!("{:?} ({})", e, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_results_are_silent() {
        let ok: Result<(), String> = Ok(());
        ok.or_log("nothing");
        let err: Result<(), String> = Err("broken".to_string());
        err.or_warn("just logged");
    }
}
