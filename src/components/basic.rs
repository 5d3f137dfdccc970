//! Leaf components: `Noop`, `Log` and `Sleep`.

use crate::models::LogLevel;
use crate::registry::{Component, ConstructError, InvokeError, Params};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Does nothing when invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Noop;

impl Noop {
    pub fn build(params: Params) -> Result<Arc<dyn Component>, ConstructError> {
        params.finish()?;
        Ok(Arc::new(Noop))
    }
}

impl Component for Noop {
    fn kind(&self) -> &str {
        "Noop"
    }

    fn invoke(&self) -> Result<(), InvokeError> {
        trace!("Noop invoked");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Emits `message` to the run log at `level` (INFO by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub message: String,
    pub level: LogLevel,
}

impl Log {
    pub fn build(mut params: Params) -> Result<Arc<dyn Component>, ConstructError> {
        let message = params.required_str("message")?;
        let level = match params.optional_str("level")? {
            None => LogLevel::default(),
            Some(name) => parse_level(params.kind(), &name)?,
        };
        params.finish()?;
        Ok(Arc::new(Log { message, level }))
    }
}

fn parse_level(kind: &str, name: &str) -> Result<LogLevel, ConstructError> {
    serde_json::from_value(serde_json::Value::String(name.to_ascii_uppercase()))
        .map_err(|_| ConstructError::parameter(kind, format!("unknown log level `{name}`")))
}

impl Component for Log {
    fn kind(&self) -> &str {
        "Log"
    }

    fn invoke(&self) -> Result<(), InvokeError> {
        let message = self.message.as_str();
        match self.level {
            LogLevel::Critical | LogLevel::Fatal | LogLevel::Error => error!("{}", message),
            LogLevel::Warning | LogLevel::Warn => warn!("{}", message),
            LogLevel::Info => info!("{}", message),
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Notset => trace!("{}", message),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Blocks the current thread for `seconds`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sleep {
    pub duration: Duration,
}

impl Sleep {
    pub fn build(mut params: Params) -> Result<Arc<dyn Component>, ConstructError> {
        let seconds = params.required_f64("seconds")?;
        params.finish()?;
        let duration = Duration::try_from_secs_f64(seconds).map_err(|e| {
            ConstructError::construction("Sleep", format!("invalid duration {seconds}: {e}"))
        })?;
        Ok(Arc::new(Sleep { duration }))
    }
}

impl Component for Sleep {
    fn kind(&self) -> &str {
        "Sleep"
    }

    fn invoke(&self) -> Result<(), InvokeError> {
        debug!(duration = ?self.duration, "Sleeping");
        std::thread::sleep(self.duration);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
