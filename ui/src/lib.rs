use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

mod api;
mod components;
mod format;
mod types;

use components::agents::{AgentForm, Agents};
use components::connections::{ConnectionForm, Connections};
use components::dashboard::Dashboard;
use components::sandbox::Sandbox;
use components::tools::{ToolForm, Tools};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-64 bg-gray-900 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"Hangar"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/" label="Dashboard" />
                        <NavLink href="/agents" label="Agents" />
                        <NavLink href="/tools" label="Tools" />
                        <NavLink href="/connections" label="Connections" />
                        <div class="border-t border-gray-700 my-4"></div>
                        <NavLink href="/sandbox" label="Sandbox" />
                    </nav>
                    <div class="text-xs text-gray-500 mt-4">
                        "Agent control plane"
                    </div>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=Dashboard/>
                        <Route path=path!("/agents/new") view=AgentForm/>
                        <Route path=path!("/agents/:id") view=AgentForm/>
                        <Route path=path!("/agents") view=Agents/>
                        <Route path=path!("/tools/new") view=ToolForm/>
                        <Route path=path!("/tools/:id") view=ToolForm/>
                        <Route path=path!("/tools") view=Tools/>
                        <Route path=path!("/connections/new") view=ConnectionForm/>
                        <Route path=path!("/connections/:id") view=ConnectionForm/>
                        <Route path=path!("/connections") view=Connections/>
                        <Route path=path!("/sandbox") view=Sandbox/>
                    </Routes>
                </div>
            </div>
        </Router>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(App);
}
