use crate::api;
use crate::types::{Agent, AgentVariant, ModelOption, Tool};
use leptos::prelude::*;
use leptos::web_sys;
use leptos_router::hooks::{use_navigate, use_params_map};

#[component]
pub fn Agents() -> impl IntoView {
    let (refresh_trigger, set_refresh_trigger) = signal(0u32);
    let (delete_target, set_delete_target) = signal(Option::<Agent>::None);
    let (deleting, set_deleting) = signal(false);

    let agents = LocalResource::new(move || {
        let _ = refresh_trigger.get();
        async move { api::list_agents().await.ok() }
    });

    let on_delete_confirm = move |_| {
        if let Some(agent) = delete_target.get() {
            set_deleting.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match api::delete_agent(&agent.id).await {
                    Ok(_) => {
                        set_delete_target.set(None);
                        set_refresh_trigger.update(|n| *n += 1);
                    }
                    Err(e) => {
                        web_sys::window()
                            .and_then(|w| w.alert_with_message(&format!("Failed to delete: {}", e)).ok());
                    }
                }
                set_deleting.set(false);
            });
        }
    };

    view! {
        <div class="p-6">
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">"Agents"</h2>
                <a href="/agents/new" class="bg-indigo-500 hover:bg-indigo-600 text-white px-4 py-2 rounded flex items-center gap-2">
                    <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"/>
                    </svg>
                    "New Agent"
                </a>
            </div>

            // Delete confirmation modal
            {move || delete_target.get().map(|agent| view! {
                <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
                    <div class="bg-white rounded-lg shadow-xl p-6 max-w-md w-full mx-4">
                        <h3 class="text-lg font-semibold text-gray-900 mb-2">"Delete Agent?"</h3>
                        <p class="text-gray-600 mb-4">
                            "Are you sure you want to delete "
                            <span class="font-semibold">{agent.name.clone()}</span>
                            "? Open sandbox sessions using it will stop accepting messages."
                        </p>
                        <div class="flex justify-end gap-3">
                            <button
                                class="px-4 py-2 text-gray-700 border border-gray-300 rounded hover:bg-gray-50"
                                on:click=move |_| set_delete_target.set(None)
                                disabled=move || deleting.get()
                            >
                                "Cancel"
                            </button>
                            <button
                                class="px-4 py-2 bg-red-500 text-white rounded hover:bg-red-600 disabled:opacity-50"
                                on:click=on_delete_confirm
                                disabled=move || deleting.get()
                            >
                                {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                            </button>
                        </div>
                    </div>
                </div>
            })}

            <Suspense fallback=move || view! { <div class="text-gray-500">"Loading agents..."</div> }>
                {move || {
                    agents.get().map(|data| match data {
                        Some(list) if !list.is_empty() => view! {
                            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                                {list.into_iter().map(|agent| view! {
                                    <AgentCard agent=agent set_delete_target=set_delete_target />
                                }).collect_view()}
                            </div>
                        }.into_any(),
                        Some(_) => view! {
                            <div class="text-center py-12 bg-white rounded-lg shadow">
                                <h3 class="text-sm font-medium text-gray-900">"No agents"</h3>
                                <p class="mt-1 text-sm text-gray-500">"Get started by building a new agent."</p>
                            </div>
                        }.into_any(),
                        None => view! {
                            <div class="text-center py-12 bg-red-50 rounded-lg border border-red-200">
                                <h3 class="text-sm font-medium text-red-800">"Failed to load agents"</h3>
                            </div>
                        }.into_any(),
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn AgentCard(agent: Agent, set_delete_target: WriteSignal<Option<Agent>>) -> impl IntoView {
    let badge = match agent.variant {
        AgentVariant::Super => ("Super Agent", "bg-purple-100 text-purple-700"),
        AgentVariant::Standard => ("Standard", "bg-gray-100 text-gray-600"),
    };
    let edit_href = format!("/agents/{}", agent.id);
    let tool_count = agent.tools.len();
    let target = agent.clone();

    view! {
        <div class="bg-white rounded-lg shadow p-4 flex flex-col">
            <div class="flex justify-between items-start mb-2">
                <h3 class="text-lg font-semibold text-gray-900">{agent.name}</h3>
                <span class=format!("px-2 py-0.5 text-xs rounded {}", badge.1)>{badge.0}</span>
            </div>
            <p class="text-sm text-gray-600 mb-1">{agent.role}</p>
            <p class="text-sm text-gray-500 flex-1">{agent.description}</p>
            <div class="mt-3 flex items-center gap-2 text-xs text-gray-500">
                <span class="font-mono bg-gray-100 px-1 rounded">{agent.model}</span>
                <span>{format!("{} tool{}", tool_count, if tool_count == 1 { "" } else { "s" })}</span>
            </div>
            <div class="mt-4 flex justify-end gap-2">
                <a href=edit_href class="px-3 py-1 text-sm text-indigo-600 hover:underline">"Edit"</a>
                <button
                    class="px-3 py-1 text-sm text-red-600 hover:underline"
                    on:click=move |_| set_delete_target.set(Some(target.clone()))
                >
                    "Delete"
                </button>
            </div>
        </div>
    }
}

/// Agent builder; `/agents/new` creates, `/agents/:id` edits
#[component]
pub fn AgentForm() -> impl IntoView {
    let params = use_params_map();
    let navigate = use_navigate();
    let agent_id = move || params.read().get("id");

    let (id, set_id) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (role, set_role) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (system_instruction, set_system_instruction) = signal(String::new());
    let (model, set_model) = signal(String::new());
    let (variant, set_variant) = signal(AgentVariant::Standard);
    let (selected_tools, set_selected_tools) = signal(Vec::<String>::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let models = LocalResource::new(|| async move { api::list_models().await.unwrap_or_default() });
    let tools = LocalResource::new(|| async move { api::list_tools().await.unwrap_or_default() });

    // Load existing agent
    Effect::new(move |_| {
        let Some(existing_id) = agent_id() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::get_agent(&existing_id).await {
                Ok(agent) => {
                    set_id.set(agent.id);
                    set_name.set(agent.name);
                    set_role.set(agent.role);
                    set_description.set(agent.description);
                    set_system_instruction.set(agent.system_instruction);
                    set_model.set(agent.model);
                    set_variant.set(agent.variant);
                    set_selected_tools.set(agent.tools);
                }
                Err(e) => set_error.set(Some(format!("Failed to load agent: {}", e))),
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

        let agent = Agent {
            id: id.get(),
            name: name.get(),
            role: role.get(),
            description: description.get(),
            system_instruction: system_instruction.get(),
            tools: selected_tools.get(),
            model: model.get(),
            variant: variant.get(),
        };

        let navigate = navigate.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::save_agent(&agent).await {
                Ok(_) => navigate("/agents", Default::default()),
                Err(e) => {
                    set_error.set(Some(e));
                    set_saving.set(false);
                }
            }
        });
    };

    let toggle_tool = move |tool_id: String, checked: bool| {
        set_selected_tools.update(|list| {
            list.retain(|t| t != &tool_id);
            if checked {
                list.push(tool_id);
            }
        });
    };

    view! {
        <div class="p-6">
            <div class="mb-6">
                <a href="/agents" class="text-indigo-500 hover:underline">"← Back to Agents"</a>
            </div>

            <h2 class="text-2xl font-bold mb-6">
                {move || if agent_id().is_some() { "Edit Agent" } else { "Agent Builder" }}
            </h2>

            <form on:submit=on_submit class="bg-white rounded-lg shadow p-6 max-w-3xl">
                {move || error.get().map(|e| view! {
                    <div class="mb-4 p-3 bg-red-100 border border-red-400 text-red-700 rounded">{e}</div>
                })}

                <div class="space-y-6">
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div>
                            <label class="block text-sm font-medium text-gray-700 mb-1">"Name *"</label>
                            <input
                                type="text"
                                required=true
                                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                placeholder="Customer Support Lead"
                                prop:value=move || name.get()
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                            />
                        </div>
                        <div>
                            <label class="block text-sm font-medium text-gray-700 mb-1">"Role"</label>
                            <input
                                type="text"
                                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                prop:value=move || role.get()
                                on:input=move |ev| set_role.set(event_target_value(&ev))
                            />
                        </div>
                    </div>

                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"Description"</label>
                        <input
                            type="text"
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
                            prop:value=move || description.get()
                            on:input=move |ev| set_description.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div>
                            <label class="block text-sm font-medium text-gray-700 mb-1">"Model"</label>
                            <Suspense fallback=|| view! { <span class="text-gray-400 text-sm">"Loading models..."</span> }>
                                {move || models.get().map(|options| view! {
                                    <ModelSelect options=options model=model set_model=set_model />
                                })}
                            </Suspense>
                        </div>
                        <div>
                            <label class="block text-sm font-medium text-gray-700 mb-1">"Type"</label>
                            <select
                                class="w-full px-3 py-2 border border-gray-300 rounded-md"
                                prop:value=move || variant.get().as_str()
                                on:change=move |ev| set_variant.set(AgentVariant::parse(&event_target_value(&ev)))
                            >
                                <option value="standard">"Standard"</option>
                                <option value="super">"Super Agent"</option>
                            </select>
                        </div>
                    </div>

                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"System Instruction"</label>
                        <textarea
                            rows="6"
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
                            placeholder="You are..."
                            prop:value=move || system_instruction.get()
                            on:input=move |ev| set_system_instruction.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-2">"Tools"</label>
                        <Suspense fallback=|| view! { <span class="text-gray-400 text-sm">"Loading tools..."</span> }>
                            {move || tools.get().map(|list: Vec<Tool>| {
                                if list.is_empty() {
                                    return view! { <p class="text-sm text-gray-500">"No tools defined yet."</p> }.into_any();
                                }
                                view! {
                                    <div class="grid grid-cols-1 md:grid-cols-2 gap-2">
                                        {list.into_iter().map(|tool| {
                                            let tool_id = tool.id.clone();
                                            let checked_id = tool.id.clone();
                                            view! {
                                                <label class="flex items-start gap-2 p-2 border rounded hover:bg-gray-50">
                                                    <input
                                                        type="checkbox"
                                                        class="mt-1"
                                                        prop:checked=move || selected_tools.get().contains(&checked_id)
                                                        on:change=move |ev| toggle_tool(tool_id.clone(), event_target_checked(&ev))
                                                    />
                                                    <span>
                                                        <span class="font-mono text-sm">{tool.name}</span>
                                                        <span class="block text-xs text-gray-500">{tool.description}</span>
                                                    </span>
                                                </label>
                                            }
                                        }).collect_view()}
                                    </div>
                                }.into_any()
                            })}
                        </Suspense>
                    </div>
                </div>

                <div class="mt-6 flex justify-end gap-3">
                    <a href="/agents" class="px-4 py-2 text-gray-700 border border-gray-300 rounded hover:bg-gray-50">"Cancel"</a>
                    <button
                        type="submit"
                        class="px-4 py-2 bg-indigo-500 text-white rounded hover:bg-indigo-600 disabled:opacity-50"
                        disabled=move || saving.get()
                    >
                        {move || if saving.get() { "Saving..." } else { "Save Agent" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[component]
fn ModelSelect(options: Vec<ModelOption>, model: ReadSignal<String>, set_model: WriteSignal<String>) -> impl IntoView {
    // Blank lets the server apply its default model
    view! {
        <select
            class="w-full px-3 py-2 border border-gray-300 rounded-md"
            prop:value=move || model.get()
            on:change=move |ev| set_model.set(event_target_value(&ev))
        >
            <option value="">"Default"</option>
            {options.into_iter().map(|option| view! {
                <option value=option.id>{option.label}</option>
            }).collect_view()}
        </select>
    }
}
