//! Client catalog: the signed-in user's records, with search and
//! add/edit/delete.
//!
//! The table always shows the last successfully fetched snapshot, filtered by
//! the search box. Every mutation waits for the backend, shows a toast, and on
//! success invalidates [`CLIENTS_LIST`] so the whole collection is fetched
//! again.

use dioxus::prelude::*;
use domain::catalog::{self, Mutation};
use domain::{CatalogState, Client, ClientDraft, ClientRecords, Phase, CLIENTS_LIST};
use ui::components::{use_toast, Button, ButtonVariant, Input};
use ui::icons::{FaPlus, FaRightFromBracket};
use ui::{notify, use_auth, use_query_client, use_session_store, ClientForm, ClientsTable, Icon, ServerRecords};

use crate::Route;

#[component]
pub fn Welcome() -> Element {
    let auth = use_auth();
    let store = use_session_store();
    let toasts = use_toast();
    let nav = use_navigator();
    let mut query = use_query_client();

    let mut catalog = use_signal(CatalogState::default);
    let mut form_open = use_signal(|| false);
    let mut editing = use_signal(|| Option::<Client>::None);
    let mut schema_checked = use_signal(|| false);

    // Runs on mount and again whenever CLIENTS_LIST is invalidated.
    let _clients = use_resource(move || async move {
        query.generation(CLIENTS_LIST);
        if !*schema_checked.peek() {
            ServerRecords.ensure_schema().await;
            schema_checked.set(true);
        }
        catalog.write().begin_load();
        let result = ServerRecords.list().await;
        if let Some(notice) = catalog.write().finish_load(result) {
            notify(toasts, notice);
        }
    });

    let run = move |mutation: Mutation| {
        spawn(async move {
            let outcome = catalog::apply(&ServerRecords, mutation).await;
            notify(toasts, outcome.notice);
            if outcome.invalidate {
                query.invalidate(CLIENTS_LIST);
            }
        });
    };

    let handle_submit = move |draft: ClientDraft| {
        let mutation = match (editing.peek().is_some(), draft.id) {
            (true, Some(id)) => Mutation::Update(id, draft.to_new_client()),
            (true, None) => {
                tracing::warn!("edit submitted without a client id, ignoring");
                return;
            }
            (false, _) => Mutation::Create(draft.to_new_client()),
        };
        run(mutation);
    };

    let handle_logout = move |_| {
        let store = store.clone();
        spawn(async move {
            let outcome = store.logout().await;
            if let Some(notice) = outcome.notice {
                notify(toasts, notice);
            }
            if let Some(destination) = outcome.redirect {
                nav.replace(Route::from(destination));
            }
        });
    };

    let state = catalog.read();
    let visible = state.visible();
    let loading = state.phase() != Phase::Ready && state.snapshot().is_empty();
    let email = auth().user.map(|u| u.email).unwrap_or_default();
    let title = if editing().is_some() { "Edit client" } else { "Add client" };

    rsx! {
        div {
            class: "catalog",
            header {
                class: "catalog-header",
                div {
                    h1 { "Clients" }
                    p { class: "muted", "{email}" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: handle_logout,
                    Icon { icon: FaRightFromBracket, width: 14, height: 14 }
                    "Sign out"
                }
            }

            div {
                class: "catalog-toolbar",
                Input {
                    r#type: "search",
                    placeholder: "Search by id, name or email",
                    value: state.search().to_string(),
                    oninput: move |evt: FormEvent| catalog.write().set_search(evt.value()),
                }
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| {
                        editing.set(None);
                        form_open.set(true);
                    },
                    Icon { icon: FaPlus, width: 14, height: 14 }
                    "Add client"
                }
            }

            if loading {
                p { class: "muted", "Loading clients..." }
            } else {
                ClientsTable {
                    clients: visible,
                    on_edit: move |client: Client| {
                        editing.set(Some(client));
                        form_open.set(true);
                    },
                    on_delete: move |id| run(Mutation::Delete(id)),
                }
            }

            ClientForm {
                open: form_open(),
                on_open_change: move |open| form_open.set(open),
                on_submit: handle_submit,
                initial_data: editing(),
                title: title.to_string(),
            }
        }
    }
}
