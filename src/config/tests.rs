use super::*;

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert!(settings.render.asset_origin.is_none());
    assert_eq!(settings.render.max_depth.get(), 128);
    assert_eq!(settings.render.long_content_threshold, 5000);
    assert!(!settings.render.sanitize_legacy_markup);
    assert!(!settings.presentation.enable_scroll);
    assert_eq!(settings.presentation.max_height.as_str(), "480px");
    assert_eq!(settings.logging.level, LevelFilter::WARN);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.render.asset_origin = Some("https://file.example.com".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = RenderOverrides {
        asset_origin: Some("https://cdn.example.com/".to_string()),
        log: LogOverrides {
            log_level: Some("debug".to_string()),
            ..Default::default()
        },
        enable_scroll: true,
        max_height: Some("60vh".to_string()),
        ..Default::default()
    };

    raw.apply_render_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.render.asset_origin.as_ref().map(AssetOrigin::as_str),
        Some("https://cdn.example.com")
    );
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(settings.presentation.enable_scroll);
    assert_eq!(settings.presentation.max_height.as_str(), "60vh");
}

#[test]
fn unset_flags_keep_file_values() {
    let mut raw = RawSettings::default();
    raw.presentation.enable_scroll = Some(true);
    raw.render.sanitize_legacy_markup = Some(true);

    raw.apply_render_overrides(&RenderOverrides::default());
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(settings.presentation.enable_scroll);
    assert!(settings.render.sanitize_legacy_markup);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = AnalyzeOverrides {
        log: LogOverrides {
            log_json: Some(true),
            ..Default::default()
        },
        long_content_threshold: Some(10),
    };

    raw.apply_analyze_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert_eq!(settings.render.long_content_threshold, 10);
}

#[test]
fn rejects_invalid_asset_origin() {
    let mut raw = RawSettings::default();
    raw.render.asset_origin = Some("cdn.example.com".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid origin");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "render.asset_origin",
            ..
        }
    ));
}

#[test]
fn blank_asset_origin_disables_rewriting() {
    let mut raw = RawSettings::default();
    raw.render.asset_origin = Some("  ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.render.asset_origin.is_none());
}

#[test]
fn rejects_zero_depth_and_bad_height() {
    let mut raw = RawSettings::default();
    raw.render.max_depth = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "render.max_depth",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.presentation.max_height = Some("tall".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "presentation.max_height",
            ..
        })
    ));
}

#[test]
fn rejects_depth_past_supported_ceiling() {
    let mut raw = RawSettings::default();
    raw.render.max_depth = Some(256);
    assert!(Settings::from_raw(raw).is_ok());

    let mut raw = RawSettings::default();
    raw.render.max_depth = Some(257);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "render.max_depth",
            ..
        })
    ));
}

#[test]
fn rejects_unknown_log_level() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn render_settings_feed_pipeline_config() {
    let mut raw = RawSettings::default();
    raw.render.asset_origin = Some("https://cdn.example.com".to_string());
    raw.render.max_depth = Some(16);
    let settings = Settings::from_raw(raw).expect("valid settings");

    let config = RenderPipelineConfig::from(&settings.render);
    assert_eq!(config.max_depth.get(), 16);
    assert_eq!(
        config.asset_origin.as_ref().map(AssetOrigin::as_str),
        Some("https://cdn.example.com")
    );
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "richdoc",
        "render",
        "--asset-origin",
        "https://cdn.example.com",
        "--enable-scroll",
        "--max-height",
        "300px",
        "--sanitize-legacy-markup",
        "post.json",
    ]);

    match args.command {
        Command::Render(render) => {
            assert_eq!(
                render.overrides.asset_origin.as_deref(),
                Some("https://cdn.example.com")
            );
            assert!(render.overrides.enable_scroll);
            assert!(render.overrides.sanitize_legacy_markup);
            assert_eq!(render.overrides.max_height.as_deref(), Some("300px"));
            assert_eq!(render.input, std::path::Path::new("post.json"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_analyze_arguments() {
    let args = CliArgs::parse_from([
        "richdoc",
        "--config-file",
        "/etc/richdoc.toml",
        "analyze",
        "--long-content-threshold",
        "100",
        "--log-json",
        "true",
        "-",
    ]);

    assert_eq!(
        args.config_file.as_deref(),
        Some(std::path::Path::new("/etc/richdoc.toml"))
    );
    match args.command {
        Command::Analyze(analyze) => {
            assert_eq!(analyze.overrides.long_content_threshold, Some(100));
            assert_eq!(analyze.overrides.log.log_json, Some(true));
            assert_eq!(analyze.input, std::path::Path::new("-"));
        }
        _ => panic!("wrong command parsed"),
    }
}
