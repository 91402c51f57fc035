use dioxus::prelude::*;

/// Full-screen spinner shown while the session is being resolved.
#[component]
pub fn LoadingScreen() -> Element {
    rsx! {
        div {
            class: "loading-screen",
            div { class: "spinner", role: "status", aria_label: "Loading" }
        }
    }
}
