use crate::api::HttpBackend;
use crate::config::AppConfig;
use crate::controller::ChatController;
use crate::render::{ChatScreen, EntryKind, TranscriptEntry};
use crate::session::Session;
use crate::storage::default_store;
use crate::strings::Strings;
use crate::types::Role;
use crate::ui::{MESSAGES_CONTAINER_ID, SignalRenderer};
use dioxus::prelude::*;
use std::rc::Rc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const AI_ICON: Asset = asset!("/assets/ai-icon.svg");

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

type AppController = ChatController<HttpBackend>;

fn format_entry_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn submit_composer(controller: Rc<AppController>, screen: Signal<ChatScreen>) {
    let text = screen.peek().input.clone();
    spawn(async move {
        let mut renderer = SignalRenderer::new(screen);
        controller.submit(&text, &mut renderer).await;
    });
}

fn clear_conversation(controller: Rc<AppController>, screen: Signal<ChatScreen>) {
    spawn(async move {
        let mut renderer = SignalRenderer::new(screen);
        controller.clear(&mut renderer).await;
    });
}

#[component]
pub fn ChatView(config: AppConfig) -> Element {
    let strings = config.locale.strings();
    let controller = use_hook(|| {
        let session = Session::restore(default_store(), config.storage_key.clone());
        Rc::new(ChatController::new(
            HttpBackend::new(config.api_url.clone()),
            session,
            strings,
        ))
    });
    let mut screen = use_signal(|| ChatScreen::new(strings));

    use_hook({
        let controller = controller.clone();
        move || {
            spawn(async move {
                let mut renderer = SignalRenderer::new(screen);
                controller.load_history(&mut renderer).await;
            });
        }
    });

    let on_send = {
        let controller = controller.clone();
        move |_: ()| submit_composer(controller.clone(), screen)
    };
    let on_clear = {
        let controller = controller.clone();
        move |_: MouseEvent| clear_conversation(controller.clone(), screen)
    };

    let view = screen();
    let send_disabled = !view.submit_enabled;

    rsx! {
        div { class: "chat-container",
            div { class: "chat-header",
                h1 { "{strings.title}" }
                button {
                    id: "clear-btn", class: "btn btn-ghost", r#type: "button",
                    onclick: on_clear,
                    "{strings.clear}"
                }
            }
            div { id: MESSAGES_CONTAINER_ID, class: "messages-container",
                for entry in view.entries.iter() {
                    TranscriptItem { key: "{entry.id}", entry: entry.clone(), strings }
                }
            }
            Composer {
                strings,
                input: view.input.clone(),
                disabled: send_disabled,
                on_input: move |value: String| screen.with_mut(|s| s.input = value),
                on_submit: on_send,
            }
        }
    }
}

/// Query input and send button. Submission goes through the form's submit
/// event, which browsers hold back while an IME composition is open.
#[component]
fn Composer(
    strings: Strings,
    input: String,
    disabled: bool,
    on_input: EventHandler<String>,
    on_submit: EventHandler<()>,
) -> Element {
    rsx! {
        form { id: "chat-form", class: "chat-form",
            onsubmit: move |ev: FormEvent| {
                ev.prevent_default();
                on_submit.call(());
            },
            input {
                id: "query-input", r#type: "text", autocomplete: "off",
                placeholder: "{strings.input_placeholder}",
                value: "{input}",
                oninput: move |ev: FormEvent| on_input.call(ev.value()),
                autofocus: true,
            }
            button {
                class: "btn btn-primary", r#type: "submit",
                disabled,
                "{strings.send}"
            }
        }
    }
}

#[component]
fn TranscriptItem(entry: TranscriptEntry, strings: Strings) -> Element {
    let timestamp = format_entry_timestamp(entry.created_at);
    match entry.kind {
        EntryKind::EmptyState => rsx! {
            div { class: "empty-state",
                p { "{strings.empty_prompt}" }
            }
        },
        EntryKind::Message { role, paragraphs } => rsx! {
            div { class: format_args!("message {}", role.as_str()),
                if role == Role::Assistant {
                    img { class: "avatar", src: AI_ICON, alt: "{strings.avatar_alt}" }
                }
                div { class: "message-content",
                    for line in paragraphs.iter() {
                        p { "{line}" }
                    }
                    if let Some(ts) = timestamp {
                        span { class: "message-timestamp", "{ts}" }
                    }
                }
            }
        },
        EntryKind::Sources { heading, items } => rsx! {
            div { class: "message system",
                div { class: "message-content",
                    p { "{heading}" }
                    div { class: "sources",
                        ul {
                            for item in items.iter() {
                                li { "{item}" }
                            }
                        }
                    }
                }
            }
        },
        EntryKind::Loading => rsx! {
            div { class: "message system loading-indicator-container",
                div { class: "loading-indicator",
                    div { class: "dot" }
                    div { class: "dot" }
                    div { class: "dot" }
                }
            }
        },
    }
}
