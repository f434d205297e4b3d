//! In-crate fakes shared by the router and dispatcher tests.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicI32, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Sent {
    Forward {
        to: ChatId,
        original: MessageRef,
        copy: MessageRef,
    },
    Text {
        chat_id: ChatId,
        text: String,
    },
    Keyboard {
        chat_id: ChatId,
        text: String,
        keyboard: InlineKeyboard,
    },
    Edit {
        msg: MessageRef,
        text: String,
    },
    Document {
        chat_id: ChatId,
        bytes: Vec<u8>,
        filename: String,
    },
    Delete(MessageRef),
}

/// Records every outbound call; individual calls can be made to fail.
pub(crate) struct FakeMessenger {
    next_id: AtomicI32,
    log: Mutex<Vec<Sent>>,
    pub fail_forward: AtomicBool,
    pub fail_keyboard: AtomicBool,
    text_failures: Mutex<HashSet<ChatId>>,
    delete_failures: Mutex<HashSet<MessageRef>>,
}

impl Default for FakeMessenger {
    fn default() -> Self {
        Self {
            next_id: AtomicI32::new(100),
            log: Mutex::new(Vec::new()),
            fail_forward: AtomicBool::new(false),
            fail_keyboard: AtomicBool::new(false),
            text_failures: Mutex::new(HashSet::new()),
            delete_failures: Mutex::new(HashSet::new()),
        }
    }
}

impl FakeMessenger {
    fn alloc(&self, chat_id: ChatId) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
        }
    }

    fn push(&self, s: Sent) {
        self.log.lock().unwrap().push(s);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id: c, text } if c == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn keyboards(&self) -> Vec<(ChatId, String, InlineKeyboard)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Keyboard {
                    chat_id,
                    text,
                    keyboard,
                } => Some((chat_id, text, keyboard)),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<(ChatId, Vec<u8>, String)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Document {
                    chat_id,
                    bytes,
                    filename,
                } => Some((chat_id, bytes, filename)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<MessageRef> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Delete(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn fail_text_to(&self, chat_id: ChatId) {
        self.text_failures.lock().unwrap().insert(chat_id);
    }

    pub fn fail_delete_of(&self, msg: MessageRef) {
        self.delete_failures.lock().unwrap().insert(msg);
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn forward_message(&self, to: ChatId, original: MessageRef) -> Result<MessageRef> {
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(Error::Transport("forward refused".to_string()));
        }
        let copy = self.alloc(to);
        self.push(Sent::Forward { to, original, copy });
        Ok(copy)
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        if self.text_failures.lock().unwrap().contains(&chat_id) {
            return Err(Error::Transport("chat unreachable".to_string()));
        }
        self.push(Sent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(self.alloc(chat_id))
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        if self.fail_keyboard.load(Ordering::SeqCst) {
            return Err(Error::Transport("keyboard refused".to_string()));
        }
        self.push(Sent::Keyboard {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(self.alloc(chat_id))
    }

    async fn edit_text(&self, msg: MessageRef, text: &str) -> Result<()> {
        self.push(Sent::Edit {
            msg,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, bytes: Vec<u8>, filename: &str) -> Result<()> {
        self.push(Sent::Document {
            chat_id,
            bytes,
            filename: filename.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        // Failed deletions are still recorded as attempts.
        self.push(Sent::Delete(msg));
        if self.delete_failures.lock().unwrap().contains(&msg) {
            return Err(Error::Transport("message can't be deleted".to_string()));
        }
        Ok(())
    }
}
