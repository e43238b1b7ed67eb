use estate_core::store::ReportStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState<S: ReportStore + Clone> {
    pub store: S,
}

impl<S: ReportStore + Clone> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}
