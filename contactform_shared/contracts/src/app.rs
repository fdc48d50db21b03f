/// Process-wide state of the hosting application, injected instead of read
/// from ambient globals.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait AppContextService: Send + Sync + 'static {
    /// Returns the site title as configured at this moment. Hosts may change
    /// it at runtime.
    fn site_title(&self) -> String;
}

#[cfg(feature = "mock")]
impl MockAppContextService {
    pub fn with_site_title(mut self, title: &str) -> Self {
        self.expect_site_title()
            .once()
            .return_const(title.to_owned());
        self
    }
}
