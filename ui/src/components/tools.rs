use crate::api;
use crate::types::{Connection, ParameterType, Tool, ToolParameter};
use leptos::prelude::*;
use leptos::web_sys;
use leptos_router::hooks::{use_navigate, use_params_map};

#[component]
pub fn Tools() -> impl IntoView {
    let (refresh_trigger, set_refresh_trigger) = signal(0u32);
    let (delete_target, set_delete_target) = signal(Option::<Tool>::None);
    let (deleting, set_deleting) = signal(false);

    let tools = LocalResource::new(move || {
        let _ = refresh_trigger.get();
        async move { api::list_tools().await.ok() }
    });

    let on_delete_confirm = move |_| {
        if let Some(tool) = delete_target.get() {
            set_deleting.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match api::delete_tool(&tool.id).await {
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
                <h2 class="text-2xl font-bold">"Tools"</h2>
                <a href="/tools/new" class="bg-green-500 hover:bg-green-600 text-white px-4 py-2 rounded flex items-center gap-2">
                    <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"/>
                    </svg>
                    "New Tool"
                </a>
            </div>

            {move || delete_target.get().map(|tool| view! {
                <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
                    <div class="bg-white rounded-lg shadow-xl p-6 max-w-md w-full mx-4">
                        <h3 class="text-lg font-semibold text-gray-900 mb-2">"Delete Tool?"</h3>
                        <p class="text-gray-600 mb-4">
                            "Are you sure you want to delete "
                            <span class="font-mono text-sm bg-gray-100 px-1 rounded">{tool.name.clone()}</span>
                            "? Agents referencing it will no longer offer it to the model."
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

            <Suspense fallback=move || view! { <LoadingState /> }>
                {move || {
                    tools.get().map(|data| match data {
                        Some(list) if !list.is_empty() => {
                            view! { <ToolTable tools=list set_delete_target=set_delete_target /> }.into_any()
                        }
                        Some(_) => view! {
                            <div class="text-center py-12 bg-white rounded-lg shadow">
                                <h3 class="text-sm font-medium text-gray-900">"No tools"</h3>
                                <p class="mt-1 text-sm text-gray-500">"Get started by creating a new tool."</p>
                            </div>
                        }.into_any(),
                        None => view! {
                            <div class="text-center py-12 bg-red-50 rounded-lg border border-red-200">
                                <h3 class="text-sm font-medium text-red-800">"Failed to load tools"</h3>
                                <p class="mt-1 text-sm text-red-600">"Please check your connection and try again."</p>
                            </div>
                        }.into_any(),
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn LoadingState() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-green-500"></div>
            <span class="ml-3 text-gray-500">"Loading tools..."</span>
        </div>
    }
}

#[component]
fn ToolTable(tools: Vec<Tool>, set_delete_target: WriteSignal<Option<Tool>>) -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow overflow-hidden">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">"Name"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">"Description"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">"Parameters"</th>
                        <th class="px-6 py-3 text-right text-xs font-medium text-gray-500 uppercase tracking-wider">"Actions"</th>
                    </tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {tools.into_iter().map(|tool| {
                        let edit_href = format!("/tools/{}", tool.id);
                        let target = tool.clone();
                        view! {
                            <tr class="hover:bg-gray-50">
                                <td class="px-6 py-4 whitespace-nowrap font-mono text-sm text-gray-900">{tool.name}</td>
                                <td class="px-6 py-4 text-sm text-gray-500">{tool.description}</td>
                                <td class="px-6 py-4 text-sm">
                                    <div class="flex flex-wrap gap-1">
                                        {tool.parameters.into_iter().map(|p| view! {
                                            <span class=if p.required { "px-2 py-0.5 text-xs rounded bg-green-100 text-green-700" } else { "px-2 py-0.5 text-xs rounded bg-gray-100 text-gray-600" }>
                                                {format!("{}: {}", p.name, p.param_type.as_str())}
                                            </span>
                                        }).collect_view()}
                                    </div>
                                </td>
                                <td class="px-6 py-4 whitespace-nowrap text-right text-sm">
                                    <a href=edit_href class="text-green-600 hover:underline mr-3">"Edit"</a>
                                    <button
                                        class="text-red-600 hover:underline"
                                        on:click=move |_| set_delete_target.set(Some(target.clone()))
                                    >
                                        "Delete"
                                    </button>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

/// `/tools/new` creates, `/tools/:id` edits
#[component]
pub fn ToolForm() -> impl IntoView {
    let params = use_params_map();
    let navigate = use_navigate();
    let tool_id = move || params.read().get("id");

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (connection_id, set_connection_id) = signal(String::new());
    let (parameters, set_parameters) = signal(Vec::<ToolParameter>::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let connections = LocalResource::new(|| async move { api::list_connections().await.unwrap_or_default() });

    Effect::new(move |_| {
        let Some(existing_id) = tool_id() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::get_tool(&existing_id).await {
                Ok(tool) => {
                    set_name.set(tool.name);
                    set_description.set(tool.description);
                    set_connection_id.set(tool.connection_id.unwrap_or_default());
                    set_parameters.set(tool.parameters);
                }
                Err(e) => set_error.set(Some(format!("Failed to load tool: {}", e))),
            }
        });
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if name.get().trim().is_empty() || description.get().trim().is_empty() {
            return;
        }
        set_saving.set(true);
        set_error.set(None);

        let connection = connection_id.get();
        let tool = Tool {
            id: tool_id().unwrap_or_default(),
            name: name.get(),
            description: description.get(),
            parameters: parameters
                .get()
                .into_iter()
                .filter(|p| !p.name.trim().is_empty())
                .collect(),
            connection_id: (!connection.is_empty()).then_some(connection),
        };
        let existing = tool_id();

        let navigate = navigate.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match existing {
                Some(id) => api::update_tool(&id, &tool).await,
                None => api::create_tool(&tool).await,
            };
            match result {
                Ok(_) => navigate("/tools", Default::default()),
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
                <a href="/tools" class="text-green-500 hover:underline">"← Back to Tools"</a>
            </div>

            <h2 class="text-2xl font-bold mb-6">
                {move || if tool_id().is_some() { "Edit Tool" } else { "New Tool" }}
            </h2>

            <form on:submit=on_submit class="bg-white rounded-lg shadow p-6 max-w-3xl">
                {move || error.get().map(|e| view! {
                    <div class="mb-4 p-3 bg-red-100 border border-red-400 text-red-700 rounded">{e}</div>
                })}

                <div class="space-y-6">
                    <div class="border-b pb-4">
                        <h3 class="text-lg font-semibold text-gray-800 mb-4">"Basic Information"</h3>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <div>
                                <label class="block text-sm font-medium text-gray-700 mb-1">"Name *"</label>
                                <input
                                    type="text"
                                    required=true
                                    class="w-full px-3 py-2 border border-gray-300 rounded-md font-mono focus:outline-none focus:ring-2 focus:ring-green-500"
                                    placeholder="check_order_status"
                                    prop:value=move || name.get()
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                />
                            </div>
                            <div>
                                <label class="block text-sm font-medium text-gray-700 mb-1">"Connection"</label>
                                <Suspense fallback=|| ()>
                                    {move || connections.get().map(|list: Vec<Connection>| view! {
                                        <select
                                            class="w-full px-3 py-2 border border-gray-300 rounded-md"
                                            prop:value=move || connection_id.get()
                                            on:change=move |ev| set_connection_id.set(event_target_value(&ev))
                                        >
                                            <option value="">"None"</option>
                                            {list.into_iter().map(|c| view! {
                                                <option value=c.id>{format!("{} ({})", c.name, c.connection_type.label())}</option>
                                            }).collect_view()}
                                        </select>
                                    })}
                                </Suspense>
                            </div>
                        </div>
                        <div class="mt-4">
                            <label class="block text-sm font-medium text-gray-700 mb-1">"Description *"</label>
                            <textarea
                                rows="2"
                                required=true
                                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-green-500"
                                placeholder="What this tool does; the model reads this"
                                prop:value=move || description.get()
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                            ></textarea>
                        </div>
                    </div>

                    <div>
                        <div class="flex justify-between items-center mb-3">
                            <h3 class="text-lg font-semibold text-gray-800">"Parameters"</h3>
                            <button
                                type="button"
                                class="px-3 py-1 text-sm bg-green-100 text-green-700 rounded hover:bg-green-200"
                                on:click=move |_| set_parameters.update(|list| list.push(ToolParameter::default()))
                            >
                                "+ Add Parameter"
                            </button>
                        </div>
                        {move || {
                            let list = parameters.get();
                            if list.is_empty() {
                                return view! { <p class="text-sm text-gray-500">"No parameters."</p> }.into_any();
                            }
                            list.into_iter().enumerate().map(|(index, param)| view! {
                                <div class="grid grid-cols-12 gap-2 items-center mb-2">
                                    <input
                                        type="text"
                                        class="col-span-3 px-2 py-1 border border-gray-300 rounded font-mono text-sm"
                                        placeholder="name"
                                        prop:value=param.name.clone()
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            edit_param(set_parameters, index, move |p| p.name = value);
                                        }
                                    />
                                    <select
                                        class="col-span-2 px-2 py-1 border border-gray-300 rounded text-sm"
                                        prop:value=param.param_type.as_str()
                                        on:change=move |ev| {
                                            let value = ParameterType::parse(&event_target_value(&ev));
                                            edit_param(set_parameters, index, move |p| p.param_type = value);
                                        }
                                    >
                                        {ParameterType::ALL.into_iter().map(|t| view! {
                                            <option value=t.as_str() selected=t == param.param_type>{t.as_str()}</option>
                                        }).collect_view()}
                                    </select>
                                    <input
                                        type="text"
                                        class="col-span-5 px-2 py-1 border border-gray-300 rounded text-sm"
                                        placeholder="description"
                                        prop:value=param.description.clone()
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            edit_param(set_parameters, index, move |p| p.description = value);
                                        }
                                    />
                                    <label class="col-span-1 flex items-center gap-1 text-xs text-gray-600">
                                        <input
                                            type="checkbox"
                                            prop:checked=param.required
                                            on:change=move |ev| {
                                                let checked = event_target_checked(&ev);
                                                edit_param(set_parameters, index, move |p| p.required = checked);
                                            }
                                        />
                                        "req"
                                    </label>
                                    <button
                                        type="button"
                                        class="col-span-1 text-red-500 hover:text-red-700 text-sm"
                                        on:click=move |_| set_parameters.update(|list| {
                                            if index < list.len() {
                                                list.remove(index);
                                            }
                                        })
                                    >
                                        "Remove"
                                    </button>
                                </div>
                            }).collect_view().into_any()
                        }}
                    </div>
                </div>

                <div class="mt-6 flex justify-end gap-3">
                    <a href="/tools" class="px-4 py-2 text-gray-700 border border-gray-300 rounded hover:bg-gray-50">"Cancel"</a>
                    <button
                        type="submit"
                        class="px-4 py-2 bg-green-500 text-white rounded hover:bg-green-600 disabled:opacity-50"
                        disabled=move || saving.get()
                    >
                        {move || if saving.get() { "Saving..." } else { "Save Tool" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

fn edit_param(
    set_parameters: WriteSignal<Vec<ToolParameter>>,
    index: usize,
    edit: impl FnOnce(&mut ToolParameter),
) {
    set_parameters.update(|list| {
        if let Some(param) = list.get_mut(index) {
            edit(param);
        }
    });
}
