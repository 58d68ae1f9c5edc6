use std::fs;
use std::process::Command;

use tempfile::TempDir;

const BAR_CONFIG: &str = r#"
version = 1
active = "files"

[[items]]
id = "home"
label = "Home"
href = "/"

[[items]]
id = "files"
label = "Files"
href = "/files"

[[items]]
id = "about"
label = "About"
href = "/about"

[[items]]
id = "settings"
label = "Settings"
href = "/settings"
"#;

#[test]
fn render_writes_bar_artifacts() {
    let root = TempDir::new().unwrap();
    let config_path = root.path().join("bar.toml");
    fs::write(&config_path, BAR_CONFIG).unwrap();
    let out = root.path().join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_glasskit"))
        .args([
            "render",
            "--config",
            config_path.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run glasskit render");
    assert!(status.success());

    let background = fs::read_to_string(out.join("background.svg")).unwrap();
    assert!(background.contains("<filter id=\"glass-nav-bg-1\">"));
    assert!(background.contains("feDisplacementMap"));
    assert!(background.contains("data:image/png;base64,"));

    let thumb = fs::read_to_string(out.join("thumb.svg")).unwrap();
    assert!(thumb.contains("<filter id=\"glass-nav-thumb-2\">"));

    let scene = fs::read_to_string(out.join("scene.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&scene).unwrap();
    assert_eq!(parsed["items"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["thumb"]["filter_id"], "glass-nav-thumb-2");
    // Active item is "files" (index 1): thumb rests centered in its slot.
    assert_eq!(parsed["thumb"]["x"], 82.0);
}

#[test]
fn render_standalone_maps_are_valid_png() {
    let root = TempDir::new().unwrap();
    let out = root.path().join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_glasskit"))
        .args([
            "render",
            "--out",
            out.to_str().unwrap(),
            "--size",
            "96x40",
            "--shape",
            "rounded-rect",
        ])
        .status()
        .expect("failed to run glasskit render");
    assert!(status.success());

    for name in ["displacement.png", "specular.png"] {
        let bytes = fs::read(out.join(name)).unwrap();
        assert_eq!(
            &bytes[..8],
            &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'],
            "{name} should carry the PNG signature"
        );
    }
    assert!(fs::read_to_string(out.join("filter.svg"))
        .unwrap()
        .contains("<feGaussianBlur"));
}

#[test]
fn simulate_replays_a_drag_to_completion() {
    let root = TempDir::new().unwrap();
    let config_path = root.path().join("bar.toml");
    fs::write(&config_path, BAR_CONFIG).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_glasskit"))
        .args([
            "simulate",
            "--config",
            config_path.to_str().unwrap(),
            "--drag",
            "10,200",
        ])
        .status()
        .expect("failed to run glasskit simulate");
    assert!(status.success());
}
