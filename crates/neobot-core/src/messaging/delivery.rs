use crate::{
    domain::{ChatId, MessageRef},
    formatting::{split_message, truncate_utf16},
    messaging::{port::MessagingPort, types::Reply},
    sniff::sniff_header,
    Result,
};

/// Send a reply, splitting long text and trimming captions to the
/// messenger's limits. Returns the refs of every message sent.
///
/// A photo the messenger refuses (for example a URL Telegram cannot fetch)
/// is replaced by its caption as text, followed by the link when there is one.
pub async fn deliver(
    port: &dyn MessagingPort,
    chat_id: ChatId,
    reply: Reply,
) -> Result<Vec<MessageRef>> {
    let caps = port.capabilities();
    let caption = |c: &Option<String>| {
        c.as_deref()
            .map(|c| truncate_utf16(c, caps.max_caption_len))
    };

    match reply {
        Reply::Text(text) => send_chunks(port, chat_id, &text).await,
        Reply::Menu { text, keyboard } => {
            let text = truncate_utf16(&text, caps.max_message_len);
            Ok(vec![port.send_menu(chat_id, &text, &keyboard).await?])
        }
        Reply::Photo { bytes, caption: full } => {
            let file_name = format!("chart.{}", sniff_header(&bytes).extension());
            let c = caption(&full);
            match port
                .send_photo_bytes(chat_id, bytes, &file_name, c.as_deref())
                .await
            {
                Ok(sent) => Ok(vec![sent]),
                Err(e) => {
                    let Some(text) = full else {
                        return Err(e);
                    };
                    tracing::warn!(error = %e, "photo upload failed, sending caption as text");
                    send_chunks(port, chat_id, &text).await
                }
            }
        }
        Reply::PhotoUrl { url, caption: full } => {
            let c = caption(&full);
            match port.send_photo_url(chat_id, &url, c.as_deref()).await {
                Ok(sent) => Ok(vec![sent]),
                Err(e) => {
                    tracing::warn!(error = %e, %url, "photo by url failed, sending link as text");
                    let text = match full {
                        Some(full) => format!("{full}\n\n{url}"),
                        None => url,
                    };
                    send_chunks(port, chat_id, &text).await
                }
            }
        }
    }
}

async fn send_chunks(
    port: &dyn MessagingPort,
    chat_id: ChatId,
    text: &str,
) -> Result<Vec<MessageRef>> {
    let mut sent = Vec::new();
    for chunk in split_message(text, port.capabilities().max_message_len) {
        sent.push(port.send_text(chat_id, &chunk).await?);
    }
    Ok(sent)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::MessageId,
        errors::Error,
        formatting::utf16_len,
        messaging::types::{ChatAction, MessagingCapabilities, ReplyKeyboard},
    };

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Sent {
        Text(String),
        Menu(String, ReplyKeyboard),
        PhotoBytes(String, Option<String>),
        PhotoUrl(String, Option<String>),
        Action(ChatAction),
    }

    /// Messenger that records what it was asked to send.
    #[derive(Default)]
    pub(crate) struct RecordingMessenger {
        pub caps: Option<MessagingCapabilities>,
        pub sent: Mutex<Vec<Sent>>,
        pub reject_photos: bool,
    }

    impl RecordingMessenger {
        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn push(&self, chat_id: ChatId, s: Sent) -> MessageRef {
            let mut v = self.sent.lock().unwrap();
            v.push(s);
            MessageRef {
                chat_id,
                message_id: MessageId(v.len() as i32),
            }
        }
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            self.caps.unwrap_or_default()
        }

        async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
            Ok(self.push(chat_id, Sent::Text(text.to_string())))
        }

        async fn send_menu(
            &self,
            chat_id: ChatId,
            text: &str,
            keyboard: &ReplyKeyboard,
        ) -> Result<MessageRef> {
            Ok(self.push(chat_id, Sent::Menu(text.to_string(), keyboard.clone())))
        }

        async fn send_photo_bytes(
            &self,
            chat_id: ChatId,
            _bytes: Vec<u8>,
            file_name: &str,
            caption: Option<&str>,
        ) -> Result<MessageRef> {
            if self.reject_photos {
                return Err(Error::External("photo rejected".to_string()));
            }
            Ok(self.push(
                chat_id,
                Sent::PhotoBytes(file_name.to_string(), caption.map(str::to_string)),
            ))
        }

        async fn send_photo_url(
            &self,
            chat_id: ChatId,
            url: &str,
            caption: Option<&str>,
        ) -> Result<MessageRef> {
            if self.reject_photos {
                return Err(Error::External("wrong file identifier/HTTP URL specified".to_string()));
            }
            Ok(self.push(
                chat_id,
                Sent::PhotoUrl(url.to_string(), caption.map(str::to_string)),
            ))
        }

        async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
            self.push(chat_id, Sent::Action(action));
            Ok(())
        }
    }

    #[tokio::test]
    async fn splits_long_text() {
        let port = RecordingMessenger {
            caps: Some(MessagingCapabilities {
                max_message_len: 50,
                max_caption_len: 20,
            }),
            ..Default::default()
        };
        let text = vec!["0123456789"; 12].join("\n");
        let refs = deliver(&port, ChatId(1), Reply::Text(text)).await.unwrap();
        assert!(refs.len() > 1);
        for s in port.sent() {
            let Sent::Text(t) = &s else {
                panic!("unexpected {s:?}");
            };
            assert!(utf16_len(t) <= 50);
        }
    }

    #[tokio::test]
    async fn truncates_caption_and_names_attachment_by_format() {
        let port = RecordingMessenger {
            caps: Some(MessagingCapabilities {
                max_message_len: 4096,
                max_caption_len: 10,
            }),
            ..Default::default()
        };
        let reply = Reply::Photo {
            bytes: b"\x89PNG\r\n\x1a\n....".to_vec(),
            caption: Some("a very long caption indeed".to_string()),
        };
        deliver(&port, ChatId(7), reply).await.unwrap();
        assert_eq!(
            port.sent(),
            vec![Sent::PhotoBytes(
                "chart.png".to_string(),
                Some("a very lo…".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn photo_url_is_forwarded() {
        let port = RecordingMessenger::default();
        let reply = Reply::PhotoUrl {
            url: "https://apod.nasa.gov/a.jpg".to_string(),
            caption: None,
        };
        deliver(&port, ChatId(7), reply).await.unwrap();
        assert_eq!(
            port.sent(),
            vec![Sent::PhotoUrl("https://apod.nasa.gov/a.jpg".to_string(), None)]
        );
    }

    #[tokio::test]
    async fn picture_caption_fits_telegram_limit() {
        let port = RecordingMessenger::default();
        let caption = format!("🌌 Nebula\n\n{}", "x".repeat(2000));
        let reply = Reply::PhotoUrl {
            url: "https://apod.nasa.gov/a.jpg".to_string(),
            caption: Some(caption),
        };
        deliver(&port, ChatId(7), reply).await.unwrap();

        let sent = port.sent();
        let Sent::PhotoUrl(_, Some(c)) = &sent[0] else {
            panic!("unexpected {sent:?}");
        };
        assert_eq!(utf16_len(c), 1024);
        assert!(c.starts_with("🌌 Nebula"));
    }

    #[tokio::test]
    async fn rejected_photo_url_falls_back_to_text_with_link() {
        let port = RecordingMessenger {
            reject_photos: true,
            ..Default::default()
        };
        let reply = Reply::PhotoUrl {
            url: "https://apod.nasa.gov/a.jpg".to_string(),
            caption: Some("🌌 Nebula\n\nGas.".to_string()),
        };
        let refs = deliver(&port, ChatId(7), reply).await.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(
            port.sent(),
            vec![Sent::Text(
                "🌌 Nebula\n\nGas.\n\nhttps://apod.nasa.gov/a.jpg".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn rejected_chart_falls_back_to_caption() {
        let port = RecordingMessenger {
            reject_photos: true,
            ..Default::default()
        };
        let reply = Reply::Photo {
            bytes: b"\x89PNG\r\n\x1a\n....".to_vec(),
            caption: Some("1. (2025 AB): 1,500,000 km".to_string()),
        };
        deliver(&port, ChatId(7), reply).await.unwrap();
        assert_eq!(
            port.sent(),
            vec![Sent::Text("1. (2025 AB): 1,500,000 km".to_string())]
        );

        let bare = Reply::Photo {
            bytes: vec![1, 2, 3],
            caption: None,
        };
        assert!(deliver(&port, ChatId(7), bare).await.is_err());
    }
}
