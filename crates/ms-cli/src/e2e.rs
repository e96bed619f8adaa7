use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;

/// Mount point of the popup document (`index.html`).
const POPUP_ROOT: &str = "#root";

pub struct E2eOptions {
    pub chromedriver_url: String,
    pub extension_path: String,
    pub headless: bool,
}

pub fn run_e2e(opts: E2eOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    runtime.block_on(run_e2e_async(opts))
}

async fn run_e2e_async(opts: E2eOptions) -> Result<(), String> {
    let extension_path = canonicalize_path(&opts.extension_path)?;

    let mut caps = ChromeCapabilities::new();
    let mut args = vec![
        format!("--disable-extensions-except={}", extension_path.display()),
        format!("--load-extension={}", extension_path.display()),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
    ];
    if opts.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    for arg in &args {
        caps.add_arg(arg)
            .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    }

    let driver = WebDriver::new(&opts.chromedriver_url, caps)
        .await
        .map_err(|e| format!("Failed to connect to chromedriver: {}", e))?;

    let cdp = ChromeDevTools::new(driver.handle.clone());
    tokio::time::sleep(Duration::from_secs(1)).await;

    let extension_id = match find_extension_id(&cdp).await {
        Some(id) => id,
        None => {
            driver.quit().await.ok();
            return Err("Failed to locate extension service worker".to_string());
        }
    };
    let popup_url = format!("chrome-extension://{}/index.html", extension_id);

    let mut errors = Vec::new();

    if let Err(e) = check_page_has_selector(&driver, &popup_url, POPUP_ROOT).await {
        errors.push(format!("Popup page check failed: {}", e));
    }

    driver.quit().await.ok();

    if errors.is_empty() {
        println!("✓ E2E checks passed");
        Ok(())
    } else {
        Err(format!("E2E failed:\n- {}", errors.join("\n- ")))
    }
}

async fn find_extension_id(cdp: &ChromeDevTools) -> Option<String> {
    let targets = cdp.execute_cdp("Target.getTargets").await.ok()?;
    extension_id_from_targets(&targets)
}

/// Extension id of the first service worker or background page target.
fn extension_id_from_targets(targets: &Value) -> Option<String> {
    let infos = targets.get("targetInfos")?.as_array()?;
    for info in infos {
        let target_type = info.get("type").and_then(Value::as_str).unwrap_or("");
        let url = info.get("url").and_then(Value::as_str).unwrap_or("");
        let is_extension_target = matches!(target_type, "service_worker" | "background_page");
        if is_extension_target && url.starts_with("chrome-extension://") {
            let id = url.trim_start_matches("chrome-extension://");
            if let Some(id) = id.split('/').next() {
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
    }
    None
}

async fn check_page_has_selector(driver: &WebDriver, url: &str, selector: &str) -> WebDriverResult<()> {
    driver.goto(url).await?;
    driver.find(By::Css(selector)).await?;
    Ok(())
}

fn canonicalize_path(path: &str) -> Result<PathBuf, String> {
    std::fs::canonicalize(path)
        .map_err(|e| format!("Failed to resolve '{}': {}", path, e))
}
