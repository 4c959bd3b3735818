use dioxus::prelude::*;
use domain::{Client, ClientId};

use crate::icons::{FaPen, FaTrash};
use crate::Icon;

/// Table of clients with per-row edit and delete actions.
#[component]
pub fn ClientsTable(
    clients: Vec<Client>,
    on_edit: EventHandler<Client>,
    on_delete: EventHandler<ClientId>,
) -> Element {
    rsx! {
        div {
            class: "clients-table",
            table {
                thead {
                    tr {
                        th { "ID" }
                        th { "Name" }
                        th { "Email" }
                        th { "Phone" }
                        th { class: "actions", "Actions" }
                    }
                }
                tbody {
                    if clients.is_empty() {
                        tr {
                            td { class: "empty", colspan: "5", "No clients found" }
                        }
                    }
                    for client in clients {
                        tr {
                            key: "{client.id}",
                            td { "{client.id}" }
                            td { "{client.name}" }
                            td { "{client.email}" }
                            td { "{client.phone}" }
                            td {
                                class: "actions",
                                button {
                                    class: "icon-button",
                                    title: "Edit",
                                    onclick: {
                                        let client = client.clone();
                                        move |_| on_edit.call(client.clone())
                                    },
                                    Icon { icon: FaPen, width: 14, height: 14 }
                                }
                                button {
                                    class: "icon-button destructive",
                                    title: "Delete",
                                    onclick: move |_| on_delete.call(client.id),
                                    Icon { icon: FaTrash, width: 14, height: 14 }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
