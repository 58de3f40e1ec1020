/// What a command produces for the user, independent of the messenger.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Text(String),
    /// Text plus a persistent reply keyboard (rows of button labels).
    Menu {
        text: String,
        keyboard: ReplyKeyboard,
    },
    /// Image bytes produced locally (e.g. a chart).
    Photo {
        bytes: Vec<u8>,
        caption: Option<String>,
    },
    /// Image hosted elsewhere; the messenger fetches it by URL.
    PhotoUrl {
        url: String,
        caption: Option<String>,
    },
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }
}

/// Persistent keyboard shown under the input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
}

impl ReplyKeyboard {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// Outgoing "chat action" (typing indicator, etc).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
}

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
    pub max_caption_len: usize,
}

impl Default for MessagingCapabilities {
    fn default() -> Self {
        // Telegram Bot API limits.
        Self {
            max_message_len: 4096,
            max_caption_len: 1024,
        }
    }
}
