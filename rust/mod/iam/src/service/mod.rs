pub mod attachment;
pub mod policy;

use std::sync::Arc;

use crate::store::IamStore;

/// The IAM service: policy lifecycle plus the policy attachment registry.
///
/// All persistence goes through the [`IamStore`]; the service adds input
/// validation, id/timestamp assignment and logging.
pub struct IamService {
    pub(crate) store: Arc<dyn IamStore>,
}

impl IamService {
    pub fn new(store: Arc<dyn IamStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<dyn IamStore> {
        &self.store
    }
}
