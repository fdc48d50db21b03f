use std::sync::{Arc, PoisonError, RwLock};

use contactform_shared_contracts::app::AppContextService;

/// Application context backed by shared mutable state. The site title is
/// seeded from the configuration and may be changed while the process runs.
#[derive(Debug, Clone)]
pub struct AppContextServiceImpl {
    site_title: Arc<RwLock<String>>,
}

impl AppContextServiceImpl {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: Arc::new(RwLock::new(site_title.into())),
        }
    }

    pub fn set_site_title(&self, title: impl Into<String>) {
        *self
            .site_title
            .write()
            .unwrap_or_else(PoisonError::into_inner) = title.into();
    }
}

impl AppContextService for AppContextServiceImpl {
    fn site_title(&self) -> String {
        self.site_title
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_title_follows_runtime_changes() {
        let sut = AppContextServiceImpl::new("First");
        assert_eq!(sut.site_title(), "First");

        sut.clone().set_site_title("Second");
        assert_eq!(sut.site_title(), "Second");
    }
}
