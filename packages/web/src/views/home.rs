//! Landing page.

use api::models::REMINDER_LEAD_MINUTES;
use dioxus::prelude::*;
use ui::components::{Card, CardContent, CardDescription, CardHeader, CardTitle};
use ui::icons::{FaCalendarDays, FaEnvelope, FaLock};
use ui::{use_auth, AuthState, Icon, LoadingScreen};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let state = auth.state().unwrap_or_else(AuthState::signed_out);
    let signed_in = !state.loading && state.user.is_some();

    // Signed-in visitors belong on the dashboard
    use_effect(use_reactive!(|signed_in| {
        if signed_in {
            nav.replace(Route::Dashboard {});
        }
    }));

    if state.loading {
        return rsx! { LoadingScreen {} };
    }
    if signed_in {
        return rsx! {};
    }

    rsx! {
        div {
            class: "landing",
            div {
                class: "container",
                div {
                    class: "hero",
                    h1 { "Quiet Hours Scheduler" }
                    p {
                        class: "lead",
                        "Schedule your silent study time blocks and receive email reminders "
                        "{REMINDER_LEAD_MINUTES} minutes before each session starts."
                    }
                    div {
                        class: "hero-actions",
                        Link { to: Route::Register {}, class: "btn btn-primary btn-lg", "Get Started" }
                        Link { to: Route::Login {}, class: "btn btn-outline btn-lg", "Sign In" }
                    }
                }

                div {
                    class: "feature-grid",
                    Card {
                        class: "text-center",
                        CardHeader {
                            CardTitle {
                                span { class: "feature-icon feature-icon-blue", Icon { icon: FaCalendarDays, width: 20, height: 20 } }
                                "Schedule Sessions"
                            }
                        }
                        CardContent {
                            CardDescription {
                                "Easily create and manage your quiet study time blocks with our intuitive interface."
                            }
                        }
                    }
                    Card {
                        class: "text-center",
                        CardHeader {
                            CardTitle {
                                span { class: "feature-icon feature-icon-green", Icon { icon: FaEnvelope, width: 20, height: 20 } }
                                "Email Reminders"
                            }
                        }
                        CardContent {
                            CardDescription {
                                "Get automated email notifications {REMINDER_LEAD_MINUTES} minutes before each scheduled session begins."
                            }
                        }
                    }
                    Card {
                        class: "text-center",
                        CardHeader {
                            CardTitle {
                                span { class: "feature-icon feature-icon-purple", Icon { icon: FaLock, width: 20, height: 20 } }
                                "No Overlaps"
                            }
                        }
                        CardContent {
                            CardDescription {
                                "Smart scheduling prevents conflicting sessions and ensures you never get duplicate reminders."
                            }
                        }
                    }
                }
            }
        }
    }
}
