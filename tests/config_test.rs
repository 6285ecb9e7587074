//! Configuration loading against real files on disk.

use adhoc_chat::common::config::{load_config, ChatConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_complete_config() {
    let file = write_config(
        r#"
device = "b"
port = 5000

[network]
A = "10.0.0.1"
"#,
    );

    let config: ChatConfig = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.device, "b");
    assert_eq!(config.port, 5000);
    assert_eq!(config.network.a, "10.0.0.1");
    assert_eq!(config.endpoint().unwrap().to_string(), "10.0.0.1:5000");
}

#[test]
fn malformed_toml_is_an_error() {
    let file = write_config("device = ");
    assert!(load_config::<ChatConfig>(file.path().to_str().unwrap()).is_err());
}

#[test]
fn missing_field_is_an_error() {
    // No port.
    let file = write_config(
        r#"
device = "A"

[network]
A = "10.0.0.1"
"#,
    );
    assert!(load_config::<ChatConfig>(file.path().to_str().unwrap()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_config::<ChatConfig>("/no/such/config.toml").is_err());
}
