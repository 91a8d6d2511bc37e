use crate::{Context, HostValue, Level, Message};

/// One emitted log event: what the host logged, at which level, with which context.
///
/// Built once per event and dropped when field resolution for it is done.
#[derive(Debug, Clone, PartialEq)]
pub struct LogOccurrence {
    pub level: Level,
    pub message: Message,
    pub context: Context,
}

impl LogOccurrence {
    pub fn new(level: Level, message: impl Into<Message>, context: Context) -> Self {
        Self {
            level,
            message: message.into(),
            context,
        }
    }

    pub fn context_value(&self, key: &str) -> Option<&HostValue> {
        self.context.get(key)
    }
}
