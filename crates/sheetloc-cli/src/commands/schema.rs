use std::fs;

pub fn run_schema(out_dir: std::path::PathBuf) -> color_eyre::Result<()> {
    let cfg = sheetloc_config::load_config()?;
    let out_dir = if out_dir.as_os_str().is_empty() {
        std::path::PathBuf::from(
            cfg.schema
                .and_then(|s| s.out_dir)
                .unwrap_or_else(|| "./docs/assets/schemas".to_string()),
        )
    } else {
        out_dir
    };
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
            tracing::debug!(event = "schema_written", path = %path.display());
        }};
    }
    dump!(sheetloc_domain::SyncReport, "sync_report.schema.json");
    dump!(sheetloc_domain::SyncEventRecord, "sync_event.schema.json");
    crate::ui_ok!("Schemas written to {}", out_dir.display());
    Ok(())
}
