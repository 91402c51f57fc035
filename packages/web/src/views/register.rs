//! Registration page view with email/password form.

use api::SignUpOutcome;
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label};
use ui::use_auth;

use super::{validate_email, validate_new_password, MIN_PASSWORD_LEN};
use crate::Route;

/// Register page component.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitted = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let signed_in = auth
        .state()
        .is_some_and(|s| !s.loading && s.user.is_some());
    use_effect(use_reactive!(|signed_in| {
        if signed_in {
            nav.replace(Route::Dashboard {});
        }
    }));

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            error.set(None);

            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();
            let cp = confirm_password();

            if let Err(msg) = validate_email(&e).and_then(|_| validate_new_password(&p, &cp)) {
                error.set(Some(msg));
                return;
            }
            let Some(ctx) = auth.context() else {
                error.set(Some("Authentication is not initialized.".to_string()));
                return;
            };

            loading.set(true);
            let name = (!n.is_empty()).then_some(n);
            let result = ctx.sign_up(e, p, name).await;
            loading.set(false);
            match result {
                // The session arrives through the auth listener and the effect
                // above takes over.
                Ok(SignUpOutcome::SignedIn) => {}
                Ok(SignUpOutcome::ConfirmationRequired) => submitted.set(true),
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    if submitted() {
        return rsx! {
            div {
                class: "page-center",
                Card {
                    class: "auth-card",
                    CardHeader {
                        CardTitle { "Account created" }
                        CardDescription { "Check your email to confirm your account." }
                    }
                    CardContent {
                        Link { to: Route::Login {}, class: "btn btn-primary full-width", "Back to sign in" }
                    }
                }
            }
        };
    }

    rsx! {
        div {
            class: "page-center",
            Card {
                class: "auth-card",
                CardHeader {
                    CardTitle { "Create Account" }
                    CardDescription { "Start scheduling your quiet hours" }
                }
                CardContent {
                    form {
                        class: "form",
                        onsubmit: handle_register,

                        if let Some(err) = error() {
                            div { class: "notice notice-error", "{err}" }
                        }

                        div {
                            class: "field",
                            Label { html_for: "name", "Name" }
                            Input {
                                id: "name",
                                placeholder: "Your name (optional)",
                                value: name(),
                                oninput: move |evt: FormEvent| name.set(evt.value()),
                            }
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
                                placeholder: "Password (min {MIN_PASSWORD_LEN} characters)",
                                value: password(),
                                oninput: move |evt: FormEvent| password.set(evt.value()),
                            }
                        }

                        div {
                            class: "field",
                            Label { html_for: "confirm-password", "Confirm password" }
                            Input {
                                id: "confirm-password",
                                r#type: "password",
                                placeholder: "Confirm password",
                                value: confirm_password(),
                                oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                            }
                        }

                        Button {
                            variant: ButtonVariant::Primary,
                            class: "full-width",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Creating account..." } else { "Sign up" }
                        }
                    }

                    div {
                        class: "form-links",
                        p {
                            "Already have an account? "
                            Link { to: Route::Login {}, "Sign in" }
                        }
                    }
                }
            }
        }
    }
}
