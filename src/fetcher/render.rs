//! JavaScript rendering backends
//!
//! A renderer turns a URL into fully rendered HTML. The fetcher treats it as
//! a drop-in replacement for a plain GET: robots and cache rules are the
//! same whichever path produced the body.

use crate::GleanError;
use async_trait::async_trait;

/// Renders a URL to HTML after running its scripts
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns the rendered HTML for `url`
    ///
    /// Failures must be reported as `GleanError::Fetch` so they share the
    /// plain fetch failure contract.
    async fn render(&self, url: &str) -> Result<String, GleanError>;
}

#[cfg(feature = "chromium")]
pub use chromium::ChromiumRenderer;

#[cfg(feature = "chromium")]
mod chromium {
    use super::Renderer;
    use crate::GleanError;
    use async_trait::async_trait;
    use chromiumoxide::{Browser, BrowserConfig};
    use futures::StreamExt;
    use tokio::task::JoinHandle;

    /// Headless Chromium renderer driven over CDP
    pub struct ChromiumRenderer {
        browser: Browser,
        handler_task: JoinHandle<()>,
    }

    impl ChromiumRenderer {
        /// Launches a headless browser
        pub async fn launch() -> Result<Self, GleanError> {
            let config = BrowserConfig::builder()
                .arg("--disable-gpu")
                .arg("--no-first-run")
                .arg("--mute-audio")
                .build()
                .map_err(|e| GleanError::Configuration(format!("Invalid browser config: {}", e)))?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| GleanError::Configuration(format!("Failed to launch browser: {}", e)))?;

            let handler_task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        tracing::trace!("Browser handler event error: {}", e);
                    }
                }
                tracing::debug!("Browser handler task completed");
            });

            Ok(Self {
                browser,
                handler_task,
            })
        }
    }

    #[async_trait]
    impl Renderer for ChromiumRenderer {
        async fn render(&self, url: &str) -> Result<String, GleanError> {
            let fetch_error = |e: chromiumoxide::error::CdpError| GleanError::Fetch {
                url: url.to_string(),
                message: format!("Render failed: {}", e),
            };

            let page = self.browser.new_page(url).await.map_err(fetch_error)?;
            page.wait_for_navigation().await.map_err(fetch_error)?;
            let html = page.content().await.map_err(fetch_error)?;

            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close page for {}: {}", url, e);
            }
            Ok(html)
        }
    }

    impl Drop for ChromiumRenderer {
        fn drop(&mut self) {
            self.handler_task.abort();
        }
    }
}
