use dioxus::prelude::*;

use domain::Destination;
use views::{Landing, Welcome};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Landing {},
    #[route("/welcome")]
    Welcome {},
}

impl From<Destination> for Route {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Landing => Route::Landing {},
            Destination::Catalog => Route::Welcome {},
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .expect("failed to start the tokio runtime")
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = match api::settings::settings().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Sessions only hold provider tokens; a restart signs everyone out.
    let session_store = MemoryStore::default();

    let expiry = match settings.server.inactivity().try_into() {
        Ok(inactivity) => Expiry::OnInactivity(inactivity),
        Err(e) => {
            tracing::error!(error = %e, "session lifetime does not fit a cookie expiry");
            std::process::exit(1);
        }
    };
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(settings.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(expiry);

    let router = axum::Router::new()
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "could not bind");
            std::process::exit(1);
        }
    };
    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router.into_make_service()).await {
        tracing::error!(error = %e, "server stopped");
    }
}

#[component]
fn App() -> Element {
    // Theme context: None = system, Some("dark"), Some("light")
    let mut theme: ui::ThemeSignal = use_context_provider(|| Signal::new(Option::<String>::None));
    use_effect(move || {
        ui::load_theme_from_storage(&mut theme);
    });

    rsx! {
        document::Link { rel: "stylesheet", href: ui::COMPONENTS_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ui::QueryClientProvider {
            ui::components::ToastProvider {
                ui::AuthProvider {
                    ui::ThemeToggle {}
                    Router::<Route> {}
                }
            }
        }
    }
}
