use std::fs;
use std::path::Path;

use chrono::Utc;

fn define(contents: &str, name: &str) -> Option<String> {
    contents
        .lines()
        .find(|l| l.contains(&format!("#define {name}")))
        .and_then(|l| l.split('"').nth(1))
        .map(str::to_string)
}

fn main() -> anyhow::Result<()> {
    // Necessary for ESP-IDF
    embuild::espidf::sysenv::output();

    // Add crash log helper for better panic diagnostics
    println!("cargo:rustc-link-arg=-Wl,--undefined=esp_backtrace_print_app_description");

    // The update check compares this against the manifest date as text, so keep it ISO.
    // Release pipelines pin FIRMWARE_BUILD_DATE and reuse it for `ota manifest --date`.
    let now = Utc::now();
    let build_date = match std::env::var("FIRMWARE_BUILD_DATE") {
        Ok(date) if !date.is_empty() => date,
        _ => now.format("%Y-%m-%d").to_string(),
    };
    println!("cargo:rustc-env=FIRMWARE_BUILD_DATE={}", build_date);
    println!("cargo:rustc-env=FIRMWARE_BUILD_TIME={}", now.format("%H:%M:%S"));
    println!("cargo:rerun-if-env-changed=FIRMWARE_BUILD_DATE");

    // Any source change restamps the image so its date never trails its manifest
    for path in ["src", "ota-core/src", "Cargo.toml", "ota-core/Cargo.toml"] {
        println!("cargo:rerun-if-changed={}", path);
    }

    // Read WiFi and update-server configuration if it exists
    let config_path = "wifi_config.h";
    println!("cargo:rerun-if-changed={}", config_path);
    if Path::new(config_path).exists() {
        let contents = fs::read_to_string(config_path)?;

        for name in ["WIFI_SSID", "WIFI_PASSWORD", "OTA_BASE_URL", "OTA_PASSWORD"] {
            let value = define(&contents, name).unwrap_or_default();
            println!("cargo:rustc-env={}={}", name, value);
        }
    } else {
        // Use empty defaults if no config file
        println!("cargo:rustc-env=WIFI_SSID=");
        println!("cargo:rustc-env=WIFI_PASSWORD=");
        println!("cargo:rustc-env=OTA_BASE_URL=");
        println!("cargo:rustc-env=OTA_PASSWORD=");
        println!("cargo:warning=wifi_config.h not found! Copy wifi_config.h.example to wifi_config.h and add your credentials.");
    }

    Ok(())
}
