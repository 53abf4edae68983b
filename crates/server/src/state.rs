use std::sync::Arc;

use common::validation::MessageCatalog;
use service::users::UserService;
use tokio_util::sync::CancellationToken;

/// Shared handler state. Built once at startup; nothing in it is mutated
/// while serving.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub catalog: Arc<MessageCatalog>,
    /// Cancelled on shutdown; every request gets a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(users: UserService, catalog: MessageCatalog) -> Self {
        Self { users, catalog: Arc::new(catalog), shutdown: CancellationToken::new() }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}
