use crate::config::AppConfig;
use crate::render::{ChatScreen, Renderer};
use crate::types::{Role, Source};
use crate::views::ChatView;
use dioxus::prelude::*;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Element id of the scrollable message list.
pub const MESSAGES_CONTAINER_ID: &str = "messages-container";

fn scroll_script(container_id: &str) -> String {
    format!(
        r#"
requestAnimationFrame(() => {{
    const el = document.getElementById('{container_id}');
    if (el) {{ el.scrollTop = el.scrollHeight; }}
}});
"#
    )
}

#[component]
pub fn App() -> Element {
    let config = use_hook(AppConfig::load);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        ChatView { config }
    }
}

/// `Renderer` over the chat screen signal; also scrolls the real list.
#[derive(Clone, Copy)]
pub struct SignalRenderer {
    screen: Signal<ChatScreen>,
}

impl SignalRenderer {
    pub fn new(screen: Signal<ChatScreen>) -> Self {
        Self { screen }
    }
}

fn scroll_list_to_bottom() {
    let _ = document::eval(&scroll_script(MESSAGES_CONTAINER_ID));
}

impl Renderer for SignalRenderer {
    fn render_message(&mut self, role: Role, content: &str) {
        self.screen.with_mut(|s| s.render_message(role, content));
        scroll_list_to_bottom();
    }

    fn render_sources(&mut self, sources: &[Source]) {
        self.screen.with_mut(|s| s.render_sources(sources));
    }

    fn set_loading(&mut self, on: bool) {
        self.screen.with_mut(|s| s.set_loading(on));
    }

    fn scroll_to_bottom(&mut self) {
        self.screen.with_mut(|s| s.scroll_to_bottom());
        scroll_list_to_bottom();
    }

    fn reset_transcript(&mut self) {
        self.screen.with_mut(|s| s.reset_transcript());
    }

    fn clear_input(&mut self) {
        self.screen.with_mut(|s| s.clear_input());
    }
}
