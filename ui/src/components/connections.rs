use crate::api;
use crate::format::rows_to_config;
use crate::types::{Connection, ConnectionStatus, ConnectionType};
use leptos::prelude::*;
use leptos::web_sys;
use leptos_router::hooks::{use_navigate, use_params_map};

#[component]
pub fn Connections() -> impl IntoView {
    let (refresh_trigger, set_refresh_trigger) = signal(0u32);

    let connections = LocalResource::new(move || {
        let _ = refresh_trigger.get();
        async move { api::list_connections().await.ok() }
    });

    let delete = move |connection: Connection| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Delete {}?", connection.name)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            match api::delete_connection(&connection.id).await {
                Ok(_) => set_refresh_trigger.update(|n| *n += 1),
                Err(e) => log::error!("Failed to delete connection {}: {}", connection.id, e),
            }
        });
    };

    view! {
        <div class="p-6">
            <div class="flex justify-between items-center mb-6">
                <div>
                    <h2 class="text-2xl font-bold">"Connections"</h2>
                    <p class="text-sm text-gray-500">"Placeholders for the systems tools would act on. Nothing is contacted."</p>
                </div>
                <a href="/connections/new" class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded">
                    "New Connection"
                </a>
            </div>

            <Suspense fallback=move || view! { <div class="text-gray-500">"Loading connections..."</div> }>
                {move || connections.get().map(|data| match data {
                    Some(list) if !list.is_empty() => view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            {list.into_iter().map(|connection| {
                                let target = connection.clone();
                                let edit_href = format!("/connections/{}", connection.id);
                                let (dot, label) = status_style(connection.status);
                                view! {
                                    <div class="bg-white rounded-lg shadow p-4">
                                        <div class="flex justify-between items-start">
                                            <div>
                                                <h3 class="font-semibold text-gray-900">{connection.name}</h3>
                                                <span class="text-xs text-gray-500 uppercase tracking-wide">
                                                    {connection.connection_type.label()}
                                                </span>
                                            </div>
                                            <span class="flex items-center gap-1 text-xs text-gray-600">
                                                <span class=format!("w-2 h-2 rounded-full {}", dot)></span>
                                                {label}
                                            </span>
                                        </div>
                                        <dl class="mt-3 text-xs text-gray-500 space-y-1">
                                            {connection.config.into_iter().map(|(key, value)| view! {
                                                <div class="flex gap-2">
                                                    <dt class="font-mono">{key}</dt>
                                                    <dd class="font-mono text-gray-700 truncate">{value}</dd>
                                                </div>
                                            }).collect_view()}
                                        </dl>
                                        <div class="mt-4 flex justify-end gap-3 text-sm">
                                            <a href=edit_href class="text-blue-600 hover:underline">"Edit"</a>
                                            <button class="text-red-600 hover:underline" on:click=move |_| delete(target.clone())>
                                                "Delete"
                                            </button>
                                        </div>
                                    </div>
                                }
                            }).collect_view()}
                        </div>
                    }.into_any(),
                    Some(_) => view! {
                        <div class="text-center py-12 bg-white rounded-lg shadow text-sm text-gray-500">"No connections."</div>
                    }.into_any(),
                    None => view! {
                        <div class="text-center py-12 bg-red-50 rounded-lg border border-red-200 text-sm text-red-800">
                            "Failed to load connections"
                        </div>
                    }.into_any(),
                })}
            </Suspense>
        </div>
    }
}

fn status_style(status: ConnectionStatus) -> (&'static str, &'static str) {
    match status {
        ConnectionStatus::Connected => ("bg-green-500", "Connected"),
        ConnectionStatus::Error => ("bg-red-500", "Error"),
        ConnectionStatus::Pending => ("bg-yellow-400", "Pending"),
    }
}

/// `/connections/new` creates, `/connections/:id` edits
#[component]
pub fn ConnectionForm() -> impl IntoView {
    let params = use_params_map();
    let navigate = use_navigate();
    let connection_id = move || params.read().get("id");

    let (name, set_name) = signal(String::new());
    let (connection_type, set_connection_type) = signal(ConnectionType::Database);
    let (rows, set_rows) = signal(vec![(String::new(), String::new())]);
    let (error, set_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    Effect::new(move |_| {
        let Some(existing_id) = connection_id() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::get_connection(&existing_id).await {
                Ok(connection) => {
                    set_name.set(connection.name);
                    set_connection_type.set(connection.connection_type);
                    set_rows.set(connection.config.into_iter().collect());
                }
                Err(e) => set_error.set(Some(format!("Failed to load connection: {}", e))),
            }
        });
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if name.get().trim().is_empty() {
            return;
        }
        set_saving.set(true);
        set_error.set(None);

        let existing = connection_id();
        let connection = Connection {
            id: existing.clone().unwrap_or_default(),
            name: name.get(),
            connection_type: connection_type.get(),
            config: rows_to_config(&rows.get()),
            status: ConnectionStatus::Connected,
        };

        let navigate = navigate.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match existing {
                Some(id) => api::update_connection(&id, &connection).await,
                None => api::create_connection(&connection).await,
            };
            match result {
                Ok(_) => navigate("/connections", Default::default()),
                Err(e) => {
                    set_error.set(Some(e));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <div class="p-6">
            <div class="mb-6">
                <a href="/connections" class="text-blue-500 hover:underline">"← Back to Connections"</a>
            </div>

            <h2 class="text-2xl font-bold mb-6">
                {move || if connection_id().is_some() { "Edit Connection" } else { "New Connection" }}
            </h2>

            <form on:submit=on_submit class="bg-white rounded-lg shadow p-6 max-w-2xl">
                {move || error.get().map(|e| view! {
                    <div class="mb-4 p-3 bg-red-100 border border-red-400 text-red-700 rounded">{e}</div>
                })}

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4 mb-6">
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"Name *"</label>
                        <input
                            type="text"
                            required=true
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
                            placeholder="PostgreSQL Production"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"Type"</label>
                        <select
                            class="w-full px-3 py-2 border border-gray-300 rounded-md"
                            prop:value=move || connection_type.get().as_str()
                            on:change=move |ev| set_connection_type.set(ConnectionType::parse(&event_target_value(&ev)))
                        >
                            {ConnectionType::ALL.into_iter().map(|t| view! {
                                <option value=t.as_str()>{t.label()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                </div>

                <div>
                    <div class="flex justify-between items-center mb-2">
                        <h3 class="text-sm font-medium text-gray-700">"Configuration"</h3>
                        <button
                            type="button"
                            class="px-3 py-1 text-sm bg-blue-100 text-blue-700 rounded hover:bg-blue-200"
                            on:click=move |_| set_rows.update(|r| r.push((String::new(), String::new())))
                        >
                            "+ Add Field"
                        </button>
                    </div>
                    {move || rows.get().into_iter().enumerate().map(|(index, (key, value))| view! {
                        <div class="flex gap-2 mb-2">
                            <input
                                type="text"
                                class="w-1/3 px-2 py-1 border border-gray-300 rounded font-mono text-sm"
                                placeholder="key"
                                prop:value=key
                                on:change=move |ev| {
                                    let key = event_target_value(&ev);
                                    set_rows.update(|r| if let Some(row) = r.get_mut(index) { row.0 = key; });
                                }
                            />
                            <input
                                type="text"
                                class="flex-1 px-2 py-1 border border-gray-300 rounded font-mono text-sm"
                                placeholder="value"
                                prop:value=value
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    set_rows.update(|r| if let Some(row) = r.get_mut(index) { row.1 = value; });
                                }
                            />
                            <button
                                type="button"
                                class="text-red-500 hover:text-red-700 text-sm"
                                on:click=move |_| set_rows.update(|r| {
                                    if index < r.len() {
                                        r.remove(index);
                                    }
                                })
                            >
                                "Remove"
                            </button>
                        </div>
                    }).collect_view()}
                </div>

                <div class="mt-6 flex justify-end gap-3">
                    <a href="/connections" class="px-4 py-2 text-gray-700 border border-gray-300 rounded hover:bg-gray-50">"Cancel"</a>
                    <button
                        type="submit"
                        class="px-4 py-2 bg-blue-500 text-white rounded hover:bg-blue-600 disabled:opacity-50"
                        disabled=move || saving.get()
                    >
                        {move || if saving.get() { "Saving..." } else { "Save Connection" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
