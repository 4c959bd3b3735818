use dioxus::prelude::*;

/// A dimmed full-screen layer holding a centered dialog card.
/// Clicking the backdrop or pressing Escape triggers `on_close`.
#[component]
pub fn ModalOverlay(on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            tabindex: "-1",
            onclick: move |_| on_close.call(()),
            onkeydown: move |evt: KeyboardEvent| {
                if evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            div {
                class: "modal-card",
                role: "dialog",
                aria_modal: "true",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                {children}
            }
        }
    }
}
