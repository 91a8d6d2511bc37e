use shiplog_types::{Context, Level, Message};

/// Downstream consumer of classified log occurrences.
///
/// Implementations must not block the caller: ship asynchronously or queue.
pub trait EventSink: Send + Sync {
    fn accept(&self, level: Level, message: Message, context: Context);
}
