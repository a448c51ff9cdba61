//! # Value Binding Module
//!
//! Binds [`Value`]s into `sqlx` `AnyArguments` in placeholder order.
//! Scalars bind natively; UUIDs and temporal values are converted to the
//! driver's text form by the [`temporal`](crate::temporal) module.

use sqlx::Arguments;
use sqlx::any::AnyArguments;

use crate::{Error, database::Drivers, temporal, value::Value};

// ============================================================================
// Value Binding Trait
// ============================================================================

/// Extension trait for binding [`Value`]s to `AnyArguments`.
pub trait ValueBinder {
    /// Binds one value using the representation `driver` expects.
    fn bind_value(&mut self, value: &Value, driver: Drivers) -> Result<(), Error>;
}

impl ValueBinder for AnyArguments<'_> {
    fn bind_value(&mut self, value: &Value, driver: Drivers) -> Result<(), Error> {
        let added = match value {
            // SQL NULL carries no type on the wire; a typed None keeps Any happy
            Value::Null => self.add(Option::<String>::None),
            Value::Bool(v) => self.add(*v),
            Value::Int(v) => self.add(*v),
            Value::Float(v) => self.add(*v),
            Value::Text(v) => self.add(v.clone()),
            Value::Bytes(v) => self.add(v.clone()),
            other => match temporal::as_driver_text(other, driver) {
                Some(text) => self.add(text),
                None => return Err(Error::conversion(&format!("Cannot bind value {}", other))),
            },
        };
        added.map_err(|e| Error::conversion(&format!("Failed to bind {}: {}", value, e)))
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Binds every value in order into a fresh `AnyArguments`.
pub fn bind_all<'q>(values: &[Value], driver: Drivers) -> Result<AnyArguments<'q>, Error> {
    let mut args = AnyArguments::default();
    for value in values {
        args.bind_value(value, driver)?;
    }
    Ok(args)
}
