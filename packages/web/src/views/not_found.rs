use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div {
            class: "page-center",
            div {
                class: "not-found",
                h1 { "Page not found" }
                p { class: "muted", "Nothing lives at /{path}." }
                Link { to: Route::Home {}, class: "btn btn-primary", "Go home" }
            }
        }
    }
}
