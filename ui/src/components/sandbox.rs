//! Chat sandbox for trying an agent against the live model
//!
//! The server owns the transcript. The page keeps a local copy that is
//! replaced by the session snapshot after every turn.

use crate::api;
use crate::format::local_time;
use crate::types::{Agent, Message, Role};
use leptos::html;
use leptos::prelude::*;
use std::sync::{Arc, Mutex};

/// The session this page opened. Closed when the page unmounts, even if the
/// create call is still in flight at that point.
#[derive(Debug, Default)]
struct SessionLease {
    id: Option<String>,
    released: bool,
}

impl SessionLease {
    /// Record a newly opened session. Returns it back when the page has
    /// already gone, so the caller can close it straight away.
    fn open(&mut self, id: String) -> Option<String> {
        if self.released {
            Some(id)
        } else {
            self.id = Some(id);
            None
        }
    }

    /// Mark the page gone and hand over the session to close, if any
    fn release(&mut self) -> Option<String> {
        self.released = true;
        self.id.take()
    }
}

fn close_session(id: String) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = api::delete_session(&id).await {
            log::warn!("Failed to close sandbox session {}: {}", id, e);
        }
    });
}

#[component]
pub fn Sandbox() -> impl IntoView {
    let (agents, set_agents) = signal(Vec::<Agent>::new());
    let (session_id, set_session_id) = signal(Option::<String>::None);
    let (agent_id, set_agent_id) = signal(String::new());
    let (messages, set_messages) = signal(Vec::<Message>::new());
    let (input, set_input) = signal(String::new());
    let (pending, set_pending) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let transcript_ref = NodeRef::<html::Div>::new();
    let lease = Arc::new(Mutex::new(SessionLease::default()));

    {
        let lease = lease.clone();
        on_cleanup(move || {
            if let Some(id) = lease.lock().ok().and_then(|mut l| l.release()) {
                close_session(id);
            }
        });
    }

    // Open a session on the first agent
    Effect::new(move |_| {
        let lease = lease.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let list = match api::list_agents().await {
                Ok(list) => list,
                Err(e) => {
                    set_error.set(Some(e));
                    return;
                }
            };
            let first = list.first().map(|a| a.id.clone());
            set_agents.set(list);
            match api::create_session(first).await {
                Ok(session) => {
                    let stale = match lease.lock() {
                        Ok(mut l) => l.open(session.id.clone()),
                        Err(_) => Some(session.id.clone()),
                    };
                    if let Some(id) = stale {
                        close_session(id);
                        return;
                    }
                    set_agent_id.set(session.agent_id.unwrap_or_default());
                    set_messages.set(session.messages);
                    set_session_id.set(Some(session.id));
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    // Keep the newest message in view
    Effect::new(move |_| {
        let _ = messages.get();
        let _ = pending.get();
        if let Some(el) = transcript_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let refresh = move |id: String| async move {
        match api::get_session(&id).await {
            Ok(session) => set_messages.set(session.messages),
            Err(e) => set_error.set(Some(e)),
        }
    };

    let send = move || {
        let content = input.get();
        let Some(id) = session_id.get() else {
            return;
        };
        if content.trim().is_empty() || pending.get() {
            return;
        }
        set_error.set(None);
        set_input.set(String::new());
        set_pending.set(true);
        set_messages.update(|list| {
            list.push(Message {
                role: Role::User,
                content: content.clone(),
                timestamp: js_sys::Date::new_0().to_iso_string().into(),
                function_calls: Vec::new(),
            })
        });

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = api::send_message(&id, &content).await {
                set_error.set(Some(e));
            }
            refresh(id).await;
            set_pending.set(false);
        });
    };

    let change_agent = move |next: String| {
        let Some(id) = session_id.get() else {
            return;
        };
        set_agent_id.set(next.clone());
        wasm_bindgen_futures::spawn_local(async move {
            match api::select_agent(&id, &next).await {
                Ok(session) => set_messages.set(session.messages),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let clear = move |_| {
        let Some(id) = session_id.get() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::clear_messages(&id).await {
                Ok(()) => set_messages.set(Vec::new()),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let selected_agent = move || agents.get().into_iter().find(|a| a.id == agent_id.get());

    view! {
        <div class="p-6 h-full flex flex-col">
            <div class="flex justify-between items-center mb-4">
                <div>
                    <h2 class="text-2xl font-bold">"Sandbox"</h2>
                    <p class="text-sm text-gray-500">
                        {move || selected_agent()
                            .map(|a| format!("{} · {}", a.role, a.model))
                            .unwrap_or_else(|| "No agent selected".to_string())}
                    </p>
                </div>
                <div class="flex items-center gap-3">
                    <select
                        class="px-3 py-2 border border-gray-300 rounded-md"
                        prop:value=move || agent_id.get()
                        disabled=move || pending.get()
                        on:change=move |ev| change_agent(event_target_value(&ev))
                    >
                        {move || agents.get().into_iter().map(|agent| view! {
                            <option value=agent.id.clone() selected=agent.id == agent_id.get_untracked()>
                                {agent.name}
                            </option>
                        }).collect_view()}
                    </select>
                    <button
                        class="px-3 py-2 text-sm border border-gray-300 rounded hover:bg-gray-50 disabled:opacity-50"
                        disabled=move || pending.get()
                        on:click=clear
                    >
                        "Clear"
                    </button>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="mb-3 p-3 bg-red-50 border border-red-200 rounded text-red-800 text-sm">{e}</div>
            })}

            <div node_ref=transcript_ref class="flex-1 overflow-y-auto bg-white rounded-lg shadow p-4 space-y-3">
                {move || {
                    let list = messages.get();
                    if list.is_empty() {
                        return view! {
                            <p class="text-center text-gray-400 text-sm py-12">"Send a message to start testing this agent."</p>
                        }.into_any();
                    }
                    list.into_iter().map(|message| view! { <MessageBubble message=message /> }).collect_view().into_any()
                }}
                {move || pending.get().then(|| view! {
                    <div class="flex items-center gap-2 text-sm text-gray-400">
                        <div class="animate-spin rounded-full h-4 w-4 border-b-2 border-indigo-500"></div>
                        "Agent is thinking..."
                    </div>
                })}
            </div>

            <div class="mt-4 flex gap-2">
                <input
                    type="text"
                    class="flex-1 px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
                    placeholder="Type a message..."
                    prop:value=move || input.get()
                    disabled=move || pending.get()
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            send();
                        }
                    }
                />
                <button
                    class="px-4 py-2 bg-indigo-500 text-white rounded hover:bg-indigo-600 disabled:opacity-50"
                    disabled=move || pending.get() || input.get().trim().is_empty()
                    on:click=move |_| send()
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}

#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let (row, bubble) = match message.role {
        Role::User => ("justify-end", "bg-indigo-500 text-white"),
        Role::Model => ("justify-start", "bg-gray-100 text-gray-900"),
        Role::System | Role::Tool => ("justify-center", "bg-red-50 text-red-700 border border-red-200 text-sm"),
    };
    let time = local_time(&message.timestamp);

    view! {
        <div class=format!("flex {}", row)>
            <div class=format!("max-w-xl rounded-lg px-4 py-2 {}", bubble)>
                <p class="whitespace-pre-wrap">{message.content}</p>
                {message.function_calls.into_iter().map(|call| view! {
                    <span class="inline-block mt-2 mr-1 px-2 py-0.5 text-xs font-mono rounded bg-yellow-100 text-yellow-800">
                        {format!("{}({})", call.name, call.args)}
                    </span>
                }).collect_view()}
                <p class="text-[10px] opacity-60 mt-1 text-right">{time}</p>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_hands_back_session_on_release() {
        let mut lease = SessionLease::default();
        assert_eq!(lease.open("s1".to_string()), None);
        assert_eq!(lease.release(), Some("s1".to_string()));
        assert_eq!(lease.release(), None);
    }

    #[test]
    fn test_session_opened_after_release_is_returned_for_closing() {
        let mut lease = SessionLease::default();
        assert_eq!(lease.release(), None);
        assert_eq!(lease.open("late".to_string()), Some("late".to_string()));
        assert_eq!(lease.release(), None);
    }
}
