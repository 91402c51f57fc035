//! Dashboard shell for signed-in users.

use api::models::REMINDER_LEAD_MINUTES;
use api::ActionError;
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle};
use ui::{use_auth, ProtectedRoute, SignOutButton};

use crate::Route;

#[component]
pub fn Dashboard() -> Element {
    rsx! {
        ProtectedRoute {
            redirect_to: "/auth/login",
            DashboardContent {}
        }
    }
}

#[component]
fn DashboardContent() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut sign_out_error = use_signal(|| Option::<String>::None);

    let Some(user) = auth.context().and_then(|ctx| ctx.user()) else {
        return rsx! {};
    };

    let on_signed_out = move |result: Result<(), ActionError>| match result {
        Ok(()) => {
            tracing::info!("Successfully signed out");
            nav.replace(Route::Home {});
        }
        Err(_) => sign_out_error.set(Some("Error signing out".to_string())),
    };

    rsx! {
        div {
            class: "dashboard",
            div {
                class: "container container-narrow",
                div {
                    class: "dashboard-header",
                    div {
                        h1 { "Dashboard" }
                        p { class: "muted", "Welcome back, {user.display_name()}!" }
                    }
                    SignOutButton { on_done: on_signed_out }
                }

                if let Some(err) = sign_out_error() {
                    div { class: "notice notice-error", "{err}" }
                }

                if user.is_transient() {
                    Card {
                        class: "card-warning",
                        CardHeader {
                            CardTitle { "Database Setup Required" }
                            CardDescription {
                                "To enable full functionality, please set up your Supabase database tables."
                            }
                        }
                        CardContent {
                            p {
                                "Your profile could not be saved because the "
                                code { "profiles" }
                                " table does not exist yet."
                            }
                            strong { "Quick setup:" }
                            ol {
                                li { "Go to your Supabase project dashboard" }
                                li { "Navigate to SQL Editor" }
                                li { "Run the SQL files in the database folder" }
                            }
                        }
                    }
                }

                div {
                    class: "card-grid",
                    Card {
                        CardHeader {
                            CardTitle { "Quiet Hours" }
                            CardDescription { "Manage your study time blocks" }
                        }
                        CardContent {
                            p { class: "muted", "Schedule and manage your quiet study sessions with automated email reminders." }
                            Button { class: "full-width", "Manage Quiet Hours" }
                        }
                    }
                    Card {
                        CardHeader {
                            CardTitle { "Upcoming Sessions" }
                            CardDescription { "Your scheduled quiet times" }
                        }
                        CardContent {
                            p { class: "muted", "No upcoming sessions scheduled." }
                            Button { variant: ButtonVariant::Outline, class: "full-width", "View All" }
                        }
                    }
                    Card {
                        CardHeader {
                            CardTitle { "Notifications" }
                            CardDescription { "Email reminder settings" }
                        }
                        CardContent {
                            p { class: "muted", "Email reminders are enabled {REMINDER_LEAD_MINUTES} minutes before each session." }
                            Button { variant: ButtonVariant::Outline, class: "full-width", "Settings" }
                        }
                    }
                }
            }
        }
    }
}
