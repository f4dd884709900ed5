use serde::{Deserialize, Serialize};

use crate::trace::value::Value;

static NULL_VALUE: Value = Value::Null;

/// Named argument of a trace call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    /// Parameter name as recorded.
    pub name: String,
    /// Recorded value.
    pub value: Value,
}

/// Per-call flags recorded by the tracer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFlags {
    /// The call ends a frame (swap buffers, present).
    #[serde(default)]
    pub end_frame: bool,
}

/// One recorded graphics API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceCall {
    /// Sequence number, strictly increasing over a trace.
    pub no: u64,
    /// Entry point name, `Interface::Method` for COM calls.
    pub name: String,
    /// Arguments in declaration order.
    #[serde(default)]
    pub args: Vec<Arg>,
    /// Return value, if the entry point has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<Value>,
    /// Call flags.
    #[serde(default)]
    pub flags: CallFlags,
    /// Thread the call was issued from.
    #[serde(default)]
    pub thread_id: u32,
}

impl TraceCall {
    /// New call without arguments.
    pub fn new(no: u64, name: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
            args: Vec::new(),
            ret: None,
            flags: CallFlags::default(),
            thread_id: 0,
        }
    }

    /// Append an argument.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push(Arg {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Set the return value.
    pub fn with_ret(mut self, value: impl Into<Value>) -> Self {
        self.ret = Some(value.into());
        self
    }

    /// Mark the call as ending a frame.
    pub fn ending_frame(mut self) -> Self {
        self.flags.end_frame = true;
        self
    }

    /// Set the issuing thread.
    pub fn on_thread(mut self, thread_id: u32) -> Self {
        self.thread_id = thread_id;
        self
    }

    /// Argument `index`, or [`Value::Null`] when the call has fewer arguments.
    pub fn arg(&self, index: usize) -> &Value {
        self.args.get(index).map_or(&NULL_VALUE, |a| &a.value)
    }

    /// Position of the argument called `name`.
    pub fn find_arg(&self, name: &str) -> Option<usize> {
        self.args.iter().position(|a| a.name == name)
    }

    /// Return value, or [`Value::Null`] for void calls.
    pub fn ret_value(&self) -> &Value {
        self.ret.as_ref().unwrap_or(&NULL_VALUE)
    }

    /// True when the call ends a frame.
    pub fn is_end_frame(&self) -> bool {
        self.flags.end_frame
    }

    /// Method part of an `Interface::Method` name, or the whole name.
    pub fn method_name(&self) -> &str {
        self.name
            .rsplit_once("::")
            .map_or(self.name.as_str(), |(_, m)| m)
    }
}
