//! Login page view with email/password form.

use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label};
use ui::use_auth;

use super::validate_email;
use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // If already logged in, go to the dashboard
    let signed_in = auth
        .state()
        .is_some_and(|s| !s.loading && s.user.is_some());
    use_effect(use_reactive!(|signed_in| {
        if signed_in {
            nav.replace(Route::Dashboard {});
        }
    }));

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();

            if let Err(msg) = validate_email(&e) {
                error.set(Some(msg));
                return;
            }
            if p.is_empty() {
                error.set(Some("Password is required".to_string()));
                return;
            }
            let Some(ctx) = auth.context() else {
                error.set(Some("Authentication is not initialized.".to_string()));
                return;
            };

            loading.set(true);
            match ctx.sign_in(e, p).await {
                Ok(()) => {
                    nav.replace(Route::Dashboard {});
                }
                Err(err) => {
                    loading.set(false);
                    error.set(Some(err.to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            class: "page-center",
            Card {
                class: "auth-card",
                CardHeader {
                    CardTitle { "Sign In" }
                    CardDescription { "Welcome back to Quiet Hours Scheduler" }
                }
                CardContent {
                    form {
                        class: "form",
                        onsubmit: handle_login,

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

                        div {
                            class: "field",
                            Label { html_for: "password", "Password" }
                            Input {
                                id: "password",
                                r#type: "password",
                                placeholder: "Password",
                                value: password(),
                                oninput: move |evt: FormEvent| password.set(evt.value()),
                            }
                        }

                        Button {
                            variant: ButtonVariant::Primary,
                            class: "full-width",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Signing in..." } else { "Sign In" }
                        }
                    }

                    div {
                        class: "form-links",
                        Link { to: Route::ForgotPassword {}, "Forgot your password?" }
                        p {
                            "Don't have an account? "
                            Link { to: Route::Register {}, "Sign up" }
                        }
                    }
                }
            }
        }
    }
}
