/// What `Client::retrieve` hands back to the application.
///
/// End of stream is a distinct variant, never a payload value, so no body
/// is ever mistaken for a control event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A body delivered by the broker, unmodified.
    Data(Vec<u8>),
    /// The client was stopped; no further messages will arrive.
    EndOfStream,
}

impl Message {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Message::EndOfStream)
    }

    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Message::Data(body) => Some(body),
            Message::EndOfStream => None,
        }
    }
}
