use tal_types::CallerId;

/// The authenticated caller of an operation.
///
/// Handed to write operations by the execution environment (the HTTP server
/// after bearer-token authentication, or the CLI for its local principal).
/// Write operations key the store by this identity only, so a caller can
/// never write another identity's record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerContext {
    caller: CallerId,
}

impl CallerContext {
    pub fn authenticated(caller: CallerId) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &CallerId {
        &self.caller
    }
}
