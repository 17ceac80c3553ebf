//! Model listing for the `models` subcommand.

use std::error::Error;

use crate::api::models::fetch_models;
use crate::api::ModelInfo;
use crate::core::config::Settings;

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// One line per model: name, marker for the configured model, then whatever
/// size and detail fields the server reported.
pub fn format_model_line(model: &ModelInfo, configured: &str) -> String {
    let mut fields = Vec::new();
    if let Some(size) = model.size {
        fields.push(format_size(size));
    }
    if let Some(details) = &model.details {
        fields.extend(
            [
                details.parameter_size.as_deref(),
                details.quantization_level.as_deref(),
                details.family.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|field| !field.is_empty())
            .map(str::to_string),
        );
    }

    let marker = if model.name == configured {
        " (configured)"
    } else {
        ""
    };
    if fields.is_empty() {
        format!("  {}{marker}", model.name)
    } else {
        format!("  {}{marker}  [{}]", model.name, fields.join(", "))
    }
}

pub async fn list_models(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::new();
    let tags = fetch_models(&client, &settings.server_url, settings.probe_timeout)
        .await
        .map_err(|err| {
            format!(
                "Could not list models from {}: {err}\n\nIs the server running? Start it with `ollama serve`.",
                settings.server_url
            )
        })?;

    println!("Models on {}", settings.server_url);
    println!();

    if tags.models.is_empty() {
        println!("No models installed. Download one with `ollama pull <model>`.");
        return Ok(());
    }

    let mut models = tags.models;
    models.sort_by(|a, b| a.name.cmp(&b.name));
    for model in &models {
        println!("{}", format_model_line(model, &settings.model));
    }

    if !models.iter().any(|model| model.name == settings.model) {
        println!();
        println!(
            "Configured model '{}' is not installed on this server.",
            settings.model
        );
    }
    Ok(())
}
