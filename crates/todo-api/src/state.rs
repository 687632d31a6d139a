use std::sync::Arc;
use todo_core::TaskStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn TaskStore>,
}

impl ApiState {
    pub fn new(store: impl TaskStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
