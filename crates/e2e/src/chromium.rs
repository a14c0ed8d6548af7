//! Real browser backend over the Chrome DevTools Protocol.
//!
//! Element handles live in a page-side registry (`window.__e2e`). Every
//! lookup stamps matched nodes with an id made of a per-document nonce and a
//! sequence number, so ids from a previous page can never resolve to a node
//! of the current one: after navigation they report as stale.

use crate::driver::{Driver, DriverConfig, DriverTimeouts, ElementId, ElementState, Screenshot};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Installs the element registry on first use in a document
const REGISTRY: &str = "(window.__e2e = window.__e2e || { \
    nonce: Math.random().toString(36).slice(2, 10), seq: 0, els: new Map(), \
    put(el) { if (!el.__e2eId) { el.__e2eId = this.nonce + ':' + (++this.seq); } \
              this.els.set(el.__e2eId, el); return el.__e2eId; }, \
    get(id) { const el = this.els.get(id); return el && el.isConnected ? el : null; } })";

/// Chromium-family browser driven through chromiumoxide
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    timeouts: Mutex<DriverTimeouts>,
    closed: AtomicBool,
    handler: tokio::task::JoinHandle<()>,
}

impl fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl ChromiumDriver {
    /// Launch a browser for `config` and open a blank page
    pub async fn launch(config: &DriverConfig) -> E2eResult<Self> {
        let mut builder = CdpConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height);
        if !config.effective_headless() {
            builder = builder.with_head();
        }
        if let Some(ref path) = config.binary {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| E2eError::BrowserLaunch { message })?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(|e| E2eError::BrowserLaunch {
                message: e.to_string(),
            })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| E2eError::BrowserLaunch {
                message: e.to_string(),
            })?;

        tracing::debug!(
            width = config.window_width,
            height = config.window_height,
            "Chromium page opened"
        );
        Ok(Self {
            browser: Mutex::new(browser),
            page,
            timeouts: Mutex::new(config.timeouts),
            closed: AtomicBool::new(false),
            handler,
        })
    }

    fn ensure_open(&self) -> E2eResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(E2eError::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// Evaluate an expression and return its JSON value (`null` when undefined)
    async fn eval(&self, expression: String) -> E2eResult<Value> {
        self.ensure_open()?;
        let limit = self.timeouts.lock().await.script;
        bounded(limit, "script evaluation", async {
            let result = self
                .page
                .evaluate(expression)
                .await
                .map_err(|e| E2eError::Script {
                    message: e.to_string(),
                })?;
            Ok(result.value().cloned().unwrap_or(Value::Null))
        })
        .await
    }

    /// Evaluate `body` with the registered element bound to `el`
    async fn on_element(&self, id: &ElementId, body: &str) -> E2eResult<Value> {
        let expression = format!(
            "(() => {{ const el = {REGISTRY}.get({id:?}); \
             if (!el) {{ return {{ stale: true }}; }} \
             return {{ value: ((el) => {{ {body} }})(el) }}; }})()",
            id = id.as_str()
        );
        let mut outcome = self.eval(expression).await?;
        if outcome.get("stale").is_some() {
            return Err(E2eError::StaleElement { id: id.to_string() });
        }
        Ok(outcome
            .get_mut("value")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Run `fut` under `limit`, reporting an expiry as a wait timeout
async fn bounded<T>(
    limit: Duration,
    what: &str,
    fut: impl Future<Output = E2eResult<T>> + Send,
) -> E2eResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| E2eError::WaitTimeout {
            waited_for: what.to_string(),
            timeout_ms: limit.as_millis() as u64,
        })?
}

fn as_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        self.ensure_open()?;
        let limit = self.timeouts.lock().await.page_load;
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map(|_| ())
                .map_err(|e| E2eError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
        };
        tokio::time::timeout(limit, navigation)
            .await
            .map_err(|_| E2eError::Navigation {
                url: url.to_string(),
                message: format!("page load exceeded {}ms", limit.as_millis()),
            })?
    }

    async fn current_url(&self) -> E2eResult<String> {
        self.ensure_open()?;
        self.page
            .url()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| E2eError::Script {
                message: e.to_string(),
            })
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(as_string(self.eval("document.title".to_string()).await?))
    }

    async fn refresh(&self) -> E2eResult<()> {
        self.ensure_open()?;
        self.page
            .reload()
            .await
            .map(|_| ())
            .map_err(|e| E2eError::Navigation {
                url: String::from("(reload)"),
                message: e.to_string(),
            })
    }

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementId>> {
        let expression = format!(
            "(() => {{ const reg = {REGISTRY}; return ({query}).map(el => reg.put(el)); }})()",
            query = locator.to_query_all()
        );
        let value = self.eval(expression).await?;
        let ids: Vec<String> = serde_json::from_value(value).map_err(|e| E2eError::Script {
            message: format!("unexpected lookup result for {locator}: {e}"),
        })?;
        Ok(ids.into_iter().map(ElementId::new).collect())
    }

    async fn element_state(&self, id: &ElementId) -> E2eResult<ElementState> {
        let value = self
            .on_element(
                id,
                "const r = el.getBoundingClientRect(); \
                 const style = getComputedStyle(el); \
                 return { \
                   displayed: r.width > 0 && r.height > 0 \
                     && style.visibility !== 'hidden' && style.display !== 'none', \
                   enabled: !el.disabled };",
            )
            .await?;
        serde_json::from_value(value).map_err(|e| E2eError::Script {
            message: format!("unexpected element state for {id}: {e}"),
        })
    }

    async fn click(&self, id: &ElementId) -> E2eResult<()> {
        let outcome = self
            .on_element(
                id,
                "if (el.disabled) { return 'disabled'; } \
                 el.scrollIntoView({ block: 'center' }); el.click(); return 'ok';",
            )
            .await?;
        if outcome == "disabled" {
            return Err(E2eError::interaction(format!("element {id} is disabled")));
        }
        Ok(())
    }

    async fn clear(&self, id: &ElementId) -> E2eResult<()> {
        self.on_element(
            id,
            "el.focus(); \
             const setter = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
             if (setter && setter.set) { setter.set.call(el, ''); } else { el.value = ''; } \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true })); return null;",
        )
        .await?;
        Ok(())
    }

    async fn send_keys(&self, id: &ElementId, text: &str) -> E2eResult<()> {
        self.on_element(
            id,
            "el.focus(); \
             if (typeof el.value === 'string') { \
               const end = el.value.length; \
               if (el.setSelectionRange) { try { el.setSelectionRange(end, end); } catch (_) {} } } \
             return null;",
        )
        .await?;
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(|e| E2eError::interaction(format!("typing into {id} failed: {e}")))?;
        Ok(())
    }

    async fn text(&self, id: &ElementId) -> E2eResult<String> {
        let value = self
            .on_element(id, "return el.innerText ?? el.textContent ?? '';")
            .await?;
        Ok(as_string(value).trim().to_string())
    }

    async fn attribute(&self, id: &ElementId, name: &str) -> E2eResult<Option<String>> {
        let body = format!(
            "const p = el[{name:?}]; \
             if (p !== undefined && p !== null && typeof p !== 'object' && typeof p !== 'function') \
             {{ return String(p); }} \
             return el.getAttribute({name:?});"
        );
        match self.on_element(id, &body).await? {
            Value::Null => Ok(None),
            other => Ok(Some(as_string(other))),
        }
    }

    async fn execute_script(
        &self,
        script: &str,
        target: Option<&ElementId>,
    ) -> E2eResult<Value> {
        match target {
            Some(id) => {
                let body = format!("return (function() {{ {script} }}).call(null, el);");
                self.on_element(id, &body).await
            }
            None => self.eval(format!("(function() {{ {script} }})()")).await,
        }
    }

    async fn screenshot(&self) -> E2eResult<Screenshot> {
        self.ensure_open()?;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let capture = self
            .page
            .execute(params)
            .await
            .map_err(|e| E2eError::Screenshot {
                message: e.to_string(),
            })?;

        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD
            .decode(&capture.data)
            .map_err(|e| E2eError::Screenshot {
                message: e.to_string(),
            })?;

        let size = self
            .eval("[window.innerWidth, window.innerHeight]".to_string())
            .await?;
        let dimension = |i: usize| size.get(i).and_then(Value::as_u64).unwrap_or(0) as u32;
        Ok(Screenshot::new(data, dimension(0), dimension(1)))
    }

    async fn set_timeouts(&self, timeouts: &DriverTimeouts) -> E2eResult<()> {
        self.ensure_open()?;
        *self.timeouts.lock().await = *timeouts;
        Ok(())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> E2eResult<()> {
        self.ensure_open()?;
        if width == 0 || height == 0 {
            return Err(E2eError::interaction(format!(
                "invalid window size {width}x{height}"
            )));
        }
        let params =
            SetDeviceMetricsOverrideParams::new(i64::from(width), i64::from(height), 1.0, false);
        self.page
            .execute(params)
            .await
            .map_err(|e| E2eError::interaction(format!("resizing window failed: {e}")))?;
        Ok(())
    }

    async fn delete_all_cookies(&self) -> E2eResult<()> {
        self.ensure_open()?;
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(|e| E2eError::interaction(format!("clearing cookies failed: {e}")))?;
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(E2eError::SessionClosed);
        }
        let mut browser = self.browser.lock().await;
        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| E2eError::BrowserLaunch {
                message: format!("closing browser failed: {e}"),
            });
        self.handler.abort();
        tracing::debug!("Chromium browser closed");
        closed
    }
}
