//! Example consumer: renders the media upload form for a rejected submission,
//! prints the schema DDL and, when `DATABASE_URL` is set, applies it.
//!
//! Run from repo root: `cargo run -p example-consumer`

use pbx_admin_sdk::entity::{media_library, validate_record};
use pbx_admin_sdk::form::{Attributes, Label};
use pbx_admin_sdk::{apply_migrations, migration_script, registry, FormConfig, FormHelper, StaticView};
use serde_json::{json, Value};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pbx_admin_sdk=info")),
        )
        .init();

    let config = FormConfig::from_env()?;
    let registry = registry()?;

    let submitted = json!({
        "description": "",
        "filename": "hold.wav",
        "path": "/var/lib/media/hold.wav",
        "category": "1"
    });
    let errors = match &submitted {
        Value::Object(record) => validate_record(&media_library(), record).scoped("media"),
        _ => Default::default(),
    };
    tracing::info!(errors = errors.len(), "submission validated");

    let view = StaticView::new("mediamanager", "add")
        .with_url("/mediamanager/add")
        .with_value("media", submitted);
    let mut form = FormHelper::new(&view).with_config(config).with_errors(&errors);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    form.open_multipart(None, Attributes::new(), &[("media[media_id]", None)])
        .emit_to(&mut out)?;
    form.open_section("Media File").emit_to(&mut out)?;
    for (field, text) in [("media[description]", "Description"), ("media[filename]", "File Name")] {
        form.label(Label::new(field).hint("Shown in the media list"), Some(text), "")
            .emit_to(&mut out)?;
        form.input(field, None, "").emit_to(&mut out)?;
        writeln!(out)?;
    }
    form.label("media[category]", Some("Category"), "").emit_to(&mut out)?;
    form.dropdown("media[category]", [("0", "General"), ("1", "Music on hold")], None, "")
        .emit_to(&mut out)?;
    form.close_section().emit_to(&mut out)?;
    form.submit("submit", "Save", "").emit_to(&mut out)?;
    form.close("\n").emit_to(&mut out)?;
    drop(out);

    for statement in migration_script(&registry)? {
        println!("{};", statement);
    }

    match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(2)
                .connect(&database_url)
                .await?;
            apply_migrations(&pool, &registry).await?;
            tracing::info!("media schema applied");
        }
        Err(_) => tracing::info!("DATABASE_URL not set, skipping migrations"),
    }
    Ok(())
}
