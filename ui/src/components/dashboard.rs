use crate::api;
use crate::format::{compact_count, percent};
use crate::types::{HealthStatus, Overview};
use leptos::prelude::*;

/// Secret the server reads the Gemini key from unless configured otherwise
const DEFAULT_KEY_NAME: &str = "GEMINI_API_KEY";

#[component]
pub fn Dashboard() -> impl IntoView {
    let (refresh_trigger, set_refresh_trigger) = signal(0u32);

    let overview = LocalResource::new(move || {
        let _ = refresh_trigger.get();
        async move { api::get_overview().await.ok() }
    });
    let health = LocalResource::new(move || {
        let _ = refresh_trigger.get();
        async move { api::get_health().await.ok() }
    });

    view! {
        <div class="p-6">
            <h2 class="text-2xl font-bold mb-6">"Dashboard"</h2>

            <Suspense fallback=move || view! { <div class="text-gray-500">"Loading..."</div> }>
                {move || {
                    match overview.get() {
                        Some(Some(overview)) => view! { <StatsGrid overview=overview /> }.into_any(),
                        Some(None) => view! {
                            <div class="bg-red-50 border border-red-200 rounded-lg p-4">
                                <p class="text-red-800">
                                    <strong>"Failed to load workspace."</strong>
                                    " Please check if the server is running properly."
                                </p>
                            </div>
                        }.into_any(),
                        None => view! {
                            <div class="text-gray-500">"Loading workspace..."</div>
                        }.into_any(),
                    }
                }}
                {move || health.get().flatten().map(|status| view! {
                    <ApiKeyCard status=status on_change=move || set_refresh_trigger.update(|n| *n += 1) />
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn StatsGrid(overview: Overview) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
            <StatCard title="Agents" value=overview.agents.to_string() color="indigo" href="/agents" />
            <StatCard title="Tools" value=overview.tools.to_string() color="green" href="/tools" />
            <StatCard
                title="Connections"
                value=format!("{}/{}", overview.connected_connections, overview.connections)
                color="blue"
                href="/connections"
            />
        </div>

        <div class="grid grid-cols-1 md:grid-cols-4 gap-4 mt-4">
            <StatCard title="Sessions" value=overview.sandbox_sessions.to_string() color="orange" href="/sandbox" />
            <StatCard title="Turns" value=overview.sandbox_turns.to_string() color="orange" href="/sandbox" />
            <StatCard title="Success Rate" value=percent(overview.success_rate) color="green" href="/sandbox" />
            <StatCard title="Tokens Used" value=compact_count(overview.tokens_used) color="purple" href="/sandbox" />
        </div>
    }
}

#[component]
fn StatCard(title: &'static str, value: String, color: &'static str, href: &'static str) -> impl IntoView {
    let (bg_class, text_class) = match color {
        "blue" => ("bg-blue-50 border-blue-200", "text-blue-600"),
        "green" => ("bg-green-50 border-green-200", "text-green-600"),
        "purple" => ("bg-purple-50 border-purple-200", "text-purple-600"),
        "orange" => ("bg-orange-50 border-orange-200", "text-orange-600"),
        "indigo" => ("bg-indigo-50 border-indigo-200", "text-indigo-600"),
        _ => ("bg-gray-50 border-gray-200", "text-gray-600"),
    };

    view! {
        <div class=format!("p-4 rounded-lg border-2 {} hover:shadow-md transition-shadow", bg_class)>
            <a href=href class="block">
                <h3 class="font-bold text-gray-500 text-sm uppercase tracking-wide">{title}</h3>
                <p class=format!("text-3xl font-bold {}", text_class)>{value}</p>
            </a>
        </div>
    }
}

/// Sets the Gemini key in the server's in-memory secrets store
#[component]
fn ApiKeyCard<F>(status: HealthStatus, on_change: F) -> impl IntoView
where
    F: Fn() + Copy + Send + Sync + 'static,
{
    let configured = status.checks.credential == "ok";
    let (key_name, set_key_name) = signal(DEFAULT_KEY_NAME.to_string());
    let (value, set_value) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    let save = move |_| {
        let key = key_name.get();
        let secret = value.get();
        if secret.trim().is_empty() {
            set_error.set(Some("Please enter a value".to_string()));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            match api::set_secret(&key, &secret).await {
                Ok(()) => {
                    set_value.set(String::new());
                    on_change();
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_saving.set(false);
        });
    };

    let clear = move |_| {
        let key = key_name.get();
        wasm_bindgen_futures::spawn_local(async move {
            match api::delete_secret(&key).await {
                Ok(()) => on_change(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="bg-white p-4 rounded-lg shadow mt-6">
            <div class="flex justify-between items-center mb-2">
                <h3 class="text-lg font-semibold text-gray-700">"Gemini API Key"</h3>
                {if configured {
                    view! { <span class="px-2 py-0.5 text-xs bg-green-100 text-green-700 rounded">"Configured"</span> }.into_any()
                } else {
                    view! { <span class="px-2 py-0.5 text-xs bg-yellow-100 text-yellow-700 rounded">"Missing"</span> }.into_any()
                }}
            </div>
            <p class="text-sm text-gray-500 mb-3">
                "Held in server memory only; the environment variable is used when nothing is set here. "
                {format!("Server v{}", status.version)}
            </p>
            {move || error.get().map(|e| view! {
                <div class="mb-3 p-2 bg-red-50 border border-red-200 rounded text-red-800 text-sm">{e}</div>
            })}
            <div class="flex gap-2">
                <input
                    type="text"
                    class="w-48 px-3 py-2 border border-gray-300 rounded-md font-mono text-sm"
                    prop:value=move || key_name.get()
                    on:input=move |ev| set_key_name.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    class="flex-1 px-3 py-2 border border-gray-300 rounded-md"
                    placeholder="Paste key"
                    prop:value=move || value.get()
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                />
                <button
                    class="px-4 py-2 bg-indigo-500 text-white rounded hover:bg-indigo-600 disabled:opacity-50"
                    disabled=move || saving.get()
                    on:click=save
                >
                    "Save"
                </button>
                <button
                    class="px-4 py-2 bg-red-100 text-red-700 rounded hover:bg-red-200"
                    on:click=clear
                >
                    "Clear"
                </button>
            </div>
        </div>
    }
}
