use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use log::debug;

use crate::error::{FojError, Result};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Anything that can appear on the left of `(...)`.
pub trait Callable {
    /// Number of arguments the callable accepts.
    fn arity(&self) -> usize;

    /// Invoke with already evaluated arguments; `arguments.len() == arity()`
    /// is checked by the caller.
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value>;
}

/// A function implemented in Rust.
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: fn(&[Value]) -> std::result::Result<Value, String>,
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, _interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        // Line 0: the interpreter stamps the call site onto the error.
        (self.func)(&arguments).map_err(|msg| FojError::runtime(0, msg))
    }
}

/// `clock()`: seconds since the Unix epoch as a number.
pub fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock".to_string(),
        arity: 0,
        func: |_args: &[Value]| {
            let timestamp: f64 = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_err(|e: SystemTimeError| format!("Clock error: {}", e))?
                .as_secs_f64();

            Ok(Value::Number(timestamp))
        },
    }
}
