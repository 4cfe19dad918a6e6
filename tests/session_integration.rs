mod common;

use authgate::config::{SessionConfig, TransportConfig};
use authgate::guards::RouteGuard;
use authgate::session::context;
use authgate::{AuthError, AuthState, AuthTransport, GuardDecision, Location, Redirect};
use common::User;
use mockito::Server;

fn is_admin(user: &User) -> bool {
    user.roles.iter().any(|role| role == "admin")
}

// The only test in this binary touching the process-wide slot.
#[tokio::test]
async fn configured_session_drives_guards_through_login_and_logout() {
    context::reset();
    assert!(matches!(
        context::get_store::<User>(),
        Err(AuthError::NotInitialized)
    ));

    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/auth")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 7, "name": "eve", "roles": ["user"]}"#)
        .create_async()
        .await;
    let logout = server
        .mock("DELETE", "/auth")
        .with_status(200)
        .create_async()
        .await;

    context::configure::<User>(SessionConfig {
        authentication_url: "/auth".to_string(),
        login_route: "/sign-in".to_string(),
        dashboard_route: "/home".to_string(),
        ..SessionConfig::default()
    });

    let session = context::get_session::<User>().expect("session is configured");
    let transport = AuthTransport::new(session.clone(), &TransportConfig::new(server.url()))
        .expect("failed to build transport");
    let guard = RouteGuard::new(session);
    let mut binding = context::get_store::<User>().unwrap().bind();
    let requested = Location::parse("/admin?tab=users");

    assert_eq!(
        guard.is_authenticated(&requested),
        GuardDecision::Redirect(Redirect::with_from("/sign-in", requested.clone()))
    );

    transport
        .login(&serde_json::json!({ "username": "eve", "password": "pw" }))
        .await
        .expect("login should succeed");
    login.assert_async().await;

    assert!(binding.changed().await.unwrap().is_logged_in());
    assert_eq!(binding.current_user().unwrap().name, "eve");
    assert_eq!(guard.is_authenticated(&requested), GuardDecision::Allow);
    assert_eq!(
        guard.is_authorized(&requested, &is_admin),
        GuardDecision::Redirect(Redirect::to("/home"))
    );

    transport.logout().await.expect("logout should succeed");
    logout.assert_async().await;

    assert_eq!(binding.changed().await.unwrap(), AuthState::LoggedOut);
    assert!(matches!(binding.current_user(), Err(AuthError::NotLoggedIn)));
    assert!(matches!(
        context::get_session::<String>(),
        Err(AuthError::UserTypeMismatch { .. })
    ));

    context::reset();
    assert!(!context::is_configured());
    assert!(!binding.is_attached());
    assert!(matches!(
        binding.changed().await,
        Err(AuthError::BindingDetached)
    ));
}

#[tokio::test]
async fn binding_stops_listening_when_dropped() {
    let store = authgate::AuthStore::<User>::new();
    let binding = store.bind();
    assert_eq!(store.subscriber_count(), 1);
    assert_eq!(binding.state(), AuthState::LoggedOut);

    drop(binding);
    assert_eq!(store.subscriber_count(), 0);
}
