use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use api::{IdentityConfig, SupabaseClient};
use ui::AuthProvider;
use views::{Dashboard, ForgotPassword, Home, Login, NotFound, Register};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/dashboard")]
    Dashboard {},
    #[route("/auth/login")]
    Login {},
    #[route("/auth/register")]
    Register {},
    #[route("/auth/forgot-password")]
    ForgotPassword {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::logger::init(Level::INFO).expect("Failed to initialize logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // One client per app instance, handed to the provider explicitly.
    let client = use_hook(|| IdentityConfig::from_env().map(SupabaseClient::new));

    let body = match client {
        Ok(client) => rsx! {
            AuthProvider {
                client,
                Router::<Route> {}
            }
        },
        Err(e) => {
            tracing::error!("Identity service is not configured: {}", e);
            rsx! {
                div {
                    class: "page-center",
                    div {
                        class: "notice notice-error",
                        h1 { "Configuration error" }
                        p { "{e}" }
                        p { "Set SUPABASE_URL and SUPABASE_ANON_KEY and rebuild." }
                    }
                }
            }
        }
    };

    rsx! {
        // Global app resources
        document::Title { "Quiet Hours Scheduler" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        {body}
    }
}
