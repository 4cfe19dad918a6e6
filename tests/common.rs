use authgate::config::{SessionConfig, TransportConfig};
use authgate::{AuthState, AuthTransport, Session, Subscriber};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

pub fn build_transport(server: &mockito::Server) -> AuthTransport<User> {
    let session = Session::configure(SessionConfig::default());
    AuthTransport::new(session, &TransportConfig::new(server.url()))
        .expect("failed to build transport")
}

pub fn add_cookie(transport: &AuthTransport<User>, cookie: &str) {
    let url: Url = transport.base_url().clone();
    transport.cookie_jar().add_cookie_str(cookie, &url);
}

/// Subscribe a recorder and return every state it sees, starting with the
/// one delivered on subscription.
pub fn record_states(transport: &AuthTransport<User>) -> Arc<Mutex<Vec<AuthState<User>>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscriber: Subscriber<User> = Arc::new(move |state| {
        sink.lock().expect("recorder poisoned").push(state);
    });
    transport.store().subscribe(subscriber);
    seen
}
