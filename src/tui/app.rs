use std::sync::Arc;

use crate::agents::{ChatMessage, Role};
use crate::constants::LANGUAGES;
use crate::render::visible_entries;
use crate::router::ChatManager;
use crate::session::Page;

/// Updates sent from a background request to the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Messages produced for a page, appended in order
    Reply { page: Page, messages: Vec<ChatMessage> },
    /// Next word of the message being revealed
    Word(String),
    /// The request finished
    Done,
    /// The request failed; the text is shown to the user
    Failed(String),
}

/// Message whose text is still being revealed word by word
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub page: Page,
    pub index: usize,
    pub text: String,
}

/// Application state
pub struct App {
    pub manager: Arc<ChatManager>,
    pub page: Page,
    /// Index into `LANGUAGES`
    pub language: usize,
    home: Vec<ChatMessage>,
    rag: Vec<ChatMessage>,
    /// User input buffer
    pub input: String,
    pub running: bool,
    /// Is a request in flight?
    pub is_generating: bool,
    pub reveal: Option<Reveal>,
    /// Failure shown at the end of the timeline until the next prompt
    pub notice: Option<String>,
    /// Scroll offset for chat view, counted from the bottom
    pub scroll_offset: u16,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(manager: Arc<ChatManager>, page: Page, language: &str) -> Self {
        let language = LANGUAGES.iter().position(|l| *l == language).unwrap_or(0);
        Self {
            manager,
            page,
            language,
            home: Vec::new(),
            rag: Vec::new(),
            input: String::new(),
            running: true,
            is_generating: false,
            reveal: None,
            notice: None,
            scroll_offset: 0,
            status_message: None,
        }
    }

    pub fn language_name(&self) -> &'static str {
        LANGUAGES[self.language]
    }

    /// History of the current page
    pub fn messages(&self) -> &[ChatMessage] {
        self.history(self.page)
    }

    fn history(&self, page: Page) -> &[ChatMessage] {
        match page {
            Page::Home => &self.home,
            Page::Rag => &self.rag,
        }
    }

    fn history_mut(&mut self, page: Page) -> &mut Vec<ChatMessage> {
        match page {
            Page::Home => &mut self.home,
            Page::Rag => &mut self.rag,
        }
    }

    /// Text to show for a message of the current page, if it is partly revealed
    pub fn revealed_text(&self, index: usize) -> Option<&str> {
        self.reveal
            .as_ref()
            .filter(|r| r.page == self.page && r.index == index)
            .map(|r| r.text.as_str())
    }

    /// Record a prompt the user just sent. Returns false if another request is running.
    pub fn submit(&mut self, prompt: &str) -> bool {
        if self.is_generating || prompt.trim().is_empty() {
            return false;
        }
        let page = self.page;
        self.history_mut(page).push(ChatMessage::new(Role::User, prompt.trim()));
        self.is_generating = true;
        self.notice = None;
        self.scroll_offset = 0;
        self.clear_status();
        true
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Reply { page, messages } => {
                let base = self.history(page).len();
                let streamed = visible_entries(&messages)
                    .iter()
                    .find(|e| e.streamed)
                    .map(|e| base + e.index);
                self.history_mut(page).extend(messages);
                self.reveal = streamed.map(|index| Reveal {
                    page,
                    index,
                    text: String::new(),
                });
                self.scroll_offset = 0;
            }
            UiEvent::Word(word) => {
                if let Some(reveal) = self.reveal.as_mut() {
                    reveal.text.push_str(&word);
                }
            }
            UiEvent::Done => {
                self.reveal = None;
                self.is_generating = false;
            }
            UiEvent::Failed(message) => {
                self.reveal = None;
                self.is_generating = false;
                self.notice = Some(message);
                self.set_status("✗ Request failed");
            }
        }
    }

    /// Switch between the home page and the RAG page
    pub fn switch_page(&mut self) {
        if self.is_generating {
            self.set_status("Wait for the current answer before switching pages");
            return;
        }
        self.page = self.page.toggle();
        self.scroll_offset = 0;
        self.set_status(format!("Page: {}", self.page.title()));
    }

    pub fn cycle_language(&mut self) {
        self.language = (self.language + 1) % LANGUAGES.len();
        self.set_status(format!("Language: {}", self.language_name()));
    }

    /// Clear the current page's history
    pub fn clear_page(&mut self) {
        if self.is_generating {
            self.set_status("Wait for the current answer before clearing");
            return;
        }
        let page = self.page;
        self.history_mut(page).clear();
        self.scroll_offset = 0;
        self.set_status("Chat cleared");
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
