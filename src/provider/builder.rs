//! Builder pattern for provider configuration.
//!
//! Provides a fluent API for configuring and creating [`Provider`]
//! instances. Collaborator seams (tunnel, resolver, factory, reporter,
//! browser list) are required; hub/dashboard URLs, credentials, file saver,
//! and keep-alive period have defaults.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::remote::{
    BrowserListProvider, CapabilityResolver, DiskFileSaver, FileSaver, GridTunnel,
    JobStatusReporter, RemoteSessionFactory,
};
use crate::session::{KeepAliveScheduler, SessionRegistry};

use super::core::{DEFAULT_DASHBOARD_URL, DEFAULT_HUB_URL, Provider, ProviderInner};

// ============================================================================
// ProviderBuilder
// ============================================================================

/// Builder for configuring a [`Provider`] instance.
///
/// Use [`Provider::builder()`] to create a new builder.
#[derive(Default)]
pub struct ProviderBuilder {
    /// Grid credentials; if unset, loaded lazily via `credentials_from_env`.
    credentials: Option<Credentials>,
    /// Hub endpoint override.
    hub_url: Option<Url>,
    /// Dashboard base URL override.
    dashboard_url: Option<Url>,
    /// Process-wide tunnel connection.
    tunnel: Option<Arc<dyn GridTunnel>>,
    /// Capability resolution.
    resolver: Option<Arc<dyn CapabilityResolver>>,
    /// Remote client factory.
    factory: Option<Arc<dyn RemoteSessionFactory>>,
    /// Job-status endpoint.
    reporter: Option<Arc<dyn JobStatusReporter>>,
    /// Screenshot persistence override.
    file_saver: Option<Arc<dyn FileSaver>>,
    /// Browser-list source.
    browser_list: Option<Arc<dyn BrowserListProvider>>,
    /// Keep-alive ping period override.
    keep_alive_period: Option<Duration>,
}

// ============================================================================
// ProviderBuilder Implementation
// ============================================================================

impl ProviderBuilder {
    /// Creates a new provider builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets explicit grid credentials.
    #[inline]
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Loads grid credentials from `GRID_USERNAME` / `GRID_ACCESS_KEY`.
    ///
    /// Missing variables leave the provider without credentials, so opens
    /// fail fast with [`Error::Auth`](crate::Error::Auth) rather than
    /// failing here.
    #[inline]
    #[must_use]
    pub fn credentials_from_env(mut self) -> Self {
        self.credentials = Credentials::from_env();
        self
    }

    /// Overrides the grid hub endpoint.
    #[inline]
    #[must_use]
    pub fn hub_url(mut self, url: Url) -> Self {
        self.hub_url = Some(url);
        self
    }

    /// Overrides the dashboard base URL used for session log links.
    #[inline]
    #[must_use]
    pub fn dashboard_url(mut self, url: Url) -> Self {
        self.dashboard_url = Some(url);
        self
    }

    /// Sets the process-wide tunnel connection.
    #[inline]
    #[must_use]
    pub fn tunnel(mut self, tunnel: Arc<dyn GridTunnel>) -> Self {
        self.tunnel = Some(tunnel);
        self
    }

    /// Sets the capability resolver.
    #[inline]
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn CapabilityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the remote session client factory.
    #[inline]
    #[must_use]
    pub fn factory(mut self, factory: Arc<dyn RemoteSessionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets the job-status reporter.
    #[inline]
    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn JobStatusReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Overrides screenshot persistence (defaults to [`DiskFileSaver`]).
    #[inline]
    #[must_use]
    pub fn file_saver(mut self, file_saver: Arc<dyn FileSaver>) -> Self {
        self.file_saver = Some(file_saver);
        self
    }

    /// Sets the browser-list source.
    #[inline]
    #[must_use]
    pub fn browser_list(mut self, browser_list: Arc<dyn BrowserListProvider>) -> Self {
        self.browser_list = Some(browser_list);
        self
    }

    /// Overrides the keep-alive ping period.
    ///
    /// Defaults to [`PING_INTERVAL`](crate::session::PING_INTERVAL).
    #[inline]
    #[must_use]
    pub fn keep_alive_period(mut self, period: Duration) -> Self {
        self.keep_alive_period = Some(period);
        self
    }

    /// Builds the provider with validation.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) if a required collaborator
    /// (tunnel, resolver, factory, reporter, browser list) is unset.
    pub fn build(self) -> Result<Provider> {
        let hub_url = match self.hub_url {
            Some(url) => url,
            None => default_url(DEFAULT_HUB_URL),
        };
        let dashboard_url = match self.dashboard_url {
            Some(url) => url,
            None => default_url(DEFAULT_DASHBOARD_URL),
        };

        let keep_alive = match self.keep_alive_period {
            Some(period) => KeepAliveScheduler::with_period(period),
            None => KeepAliveScheduler::new(),
        };

        let inner = ProviderInner {
            credentials: self.credentials,
            hub_url,
            dashboard_url,
            tunnel: require(self.tunnel, "tunnel")?,
            resolver: require(self.resolver, "resolver")?,
            factory: require(self.factory, "factory")?,
            reporter: require(self.reporter, "reporter")?,
            file_saver: self
                .file_saver
                .unwrap_or_else(|| Arc::new(DiskFileSaver::new())),
            browser_list: require(self.browser_list, "browser_list")?,
            registry: SessionRegistry::new(),
            keep_alive,
            browser_names: Mutex::new(Vec::new()),
        };

        Ok(Provider {
            inner: Arc::new(inner),
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Unwraps a required collaborator or fails with a config error naming it.
fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| {
        Error::config(format!(
            "{name} is required. Use ProviderBuilder::{name}() to set it."
        ))
    })
}

/// Parses a compile-time default URL.
fn default_url(raw: &str) -> Url {
    // Defaults are valid by construction; a parse failure here is a bug.
    Url::parse(raw).unwrap_or_else(|e| unreachable!("invalid default URL {raw}: {e}"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::identifiers::{BrowserId, RemoteSessionId};
    use crate::remote::{Capabilities, JobResultKind, RemoteSessionClient};

    struct NullTunnel;

    #[async_trait]
    impl GridTunnel for NullTunnel {
        async fn connect(&self) -> Result<()> {
            Ok(())
        }
        async fn destroy(&self) -> Result<()> {
            Ok(())
        }
    }

    struct NullResolver;

    #[async_trait]
    impl CapabilityResolver for NullResolver {
        async fn resolve(&self, _id: &BrowserId, _browser_name: &str) -> Result<Capabilities> {
            Ok(Capabilities::new(json!({})))
        }
    }

    struct NullClient;

    #[async_trait]
    impl RemoteSessionClient for NullClient {
        async fn init(&self, _capabilities: &Capabilities) -> Result<RemoteSessionId> {
            Ok(RemoteSessionId::new("null"))
        }
        async fn get(&self, _url: &str) -> Result<()> {
            Ok(())
        }
        async fn eval(&self, _expression: &str) -> Result<Value> {
            Ok(Value::Null)
        }
        async fn window_handle(&self) -> Result<String> {
            Ok("w0".into())
        }
        async fn window_size(&self, _handle: &str, _width: u32, _height: u32) -> Result<()> {
            Ok(())
        }
        async fn maximize(&self, _handle: &str) -> Result<()> {
            Ok(())
        }
        async fn take_screenshot(&self) -> Result<String> {
            Ok(String::new())
        }
        async fn quit(&self) -> Result<()> {
            Ok(())
        }
    }

    struct NullFactory;

    impl RemoteSessionFactory for NullFactory {
        fn create(&self, _hub: &Url, _credentials: &Credentials) -> Arc<dyn RemoteSessionClient> {
            Arc::new(NullClient)
        }
    }

    struct NullReporter;

    #[async_trait]
    impl JobStatusReporter for NullReporter {
        async fn update(
            &self,
            _remote_session_id: &RemoteSessionId,
            _job_result: &str,
            _job_data: &Value,
            _kind: JobResultKind,
        ) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    struct NullBrowsers;

    #[async_trait]
    impl BrowserListProvider for NullBrowsers {
        async fn list(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn complete_builder() -> ProviderBuilder {
        ProviderBuilder::new()
            .tunnel(Arc::new(NullTunnel))
            .resolver(Arc::new(NullResolver))
            .factory(Arc::new(NullFactory))
            .reporter(Arc::new(NullReporter))
            .browser_list(Arc::new(NullBrowsers))
    }

    #[test]
    fn test_build_with_all_collaborators() {
        let provider = complete_builder().build().unwrap();
        assert_eq!(provider.hub_url().as_str(), "https://hub.gridhost.io/wd/hub");
        assert_eq!(provider.session_count(), 0);
    }

    #[test]
    fn test_build_fails_without_tunnel() {
        let result = ProviderBuilder::new()
            .resolver(Arc::new(NullResolver))
            .factory(Arc::new(NullFactory))
            .reporter(Arc::new(NullReporter))
            .browser_list(Arc::new(NullBrowsers))
            .build();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("tunnel"));
    }

    #[test]
    fn test_build_fails_without_resolver() {
        let result = ProviderBuilder::new()
            .tunnel(Arc::new(NullTunnel))
            .factory(Arc::new(NullFactory))
            .reporter(Arc::new(NullReporter))
            .browser_list(Arc::new(NullBrowsers))
            .build();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("resolver"));
    }

    #[test]
    fn test_hub_and_dashboard_overrides() {
        let provider = complete_builder()
            .hub_url(Url::parse("https://hub.example.com/wd/hub").unwrap())
            .dashboard_url(Url::parse("https://dash.example.com").unwrap())
            .build()
            .unwrap();

        assert_eq!(provider.hub_url().as_str(), "https://hub.example.com/wd/hub");
    }

    #[test]
    fn test_explicit_credentials() {
        let provider = complete_builder()
            .credentials(Credentials::new("user", "key").unwrap())
            .build()
            .unwrap();

        assert!(provider.inner.credentials.is_some());
    }

    #[test]
    fn test_builder_without_credentials_still_builds() {
        // Missing credentials are an open-time failure, not a build failure.
        let provider = complete_builder().build().unwrap();
        assert!(provider.inner.credentials.is_none());
    }
}
