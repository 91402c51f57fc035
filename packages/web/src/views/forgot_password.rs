use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label};
use ui::use_auth;

use super::validate_email;
use crate::Route;

#[component]
pub fn ForgotPassword() -> Element {
    let auth = use_auth();
    let mut email = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut sent = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_reset = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            if let Err(msg) = validate_email(&e) {
                error.set(Some(msg));
                return;
            }
            let Some(ctx) = auth.context() else {
                error.set(Some("Authentication is not initialized.".to_string()));
                return;
            };

            loading.set(true);
            let result = ctx.reset_password(e).await;
            loading.set(false);
            match result {
                Ok(()) => sent.set(true),
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    rsx! {
        div {
            class: "page-center",
            Card {
                class: "auth-card",
                CardHeader {
                    CardTitle { "Reset Password" }
                    CardDescription { "We'll email you a link to choose a new password" }
                }
                CardContent {
                    if sent() {
                        div {
                            class: "notice",
                            "If an account exists for {email}, a password reset link is on its way."
                        }
                    } else {
                        form {
                            class: "form",
                            onsubmit: handle_reset,

                            if let Some(err) = error() {
                                div { class: "notice notice-error", "{err}" }
                            }

                            div {
                                class: "field",
                                Label { html_for: "email", "Email" }
                                Input {
                                    id: "email",
                                    r#type: "email",
                                    placeholder: "you@example.com",
                                    value: email(),
                                    oninput: move |evt: FormEvent| email.set(evt.value()),
                                }
                            }

                            Button {
                                variant: ButtonVariant::Primary,
                                class: "full-width",
                                r#type: "submit",
                                disabled: loading(),
                                if loading() { "Sending..." } else { "Send reset link" }
                            }
                        }
                    }

                    div {
                        class: "form-links",
                        Link { to: Route::Login {}, "Back to sign in" }
                    }
                }
            }
        }
    }
}
