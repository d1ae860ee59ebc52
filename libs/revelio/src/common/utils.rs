use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Write;
use std::path::Path;

use super::{Result, RevelioError};

pub fn init_logger_exe() {
    let name = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    init_logger(name);
}

/// Logs go to stderr so the annotation output on stdout stays clean.
/// Without `RUST_LOG` the crate logs at `warn`; when set, `RUST_LOG` replaces
/// those defaults entirely.
pub fn init_logger(name: impl Into<String>) {
    let crate_name = name.into().replace('-', "_");
    let filters = log_filters(&crate_name, std::env::var("RUST_LOG").ok());

    let _ = env_logger::builder()
        .parse_filters(&filters)
        .format(move |f, rec| {
            let now = humantime::format_rfc3339_millis(std::time::SystemTime::now());
            let module = rec.module_path().unwrap_or("<unknown>");
            let line = rec.line().unwrap_or(u32::MIN);
            let level = rec.level();

            writeln!(
                f,
                "[{} {} {} {}:{}] {}",
                level,
                crate_name,
                now,
                module,
                line,
                rec.args()
            )
        })
        .try_init();
}

fn log_filters(crate_name: &str, rust_log: Option<String>) -> String {
    if let Some(spec) = rust_log.filter(|spec| !spec.trim().is_empty()) {
        return spec;
    }
    if crate_name == "revelio" {
        "revelio=warn".to_string()
    } else {
        format!("{}=warn,revelio=warn", crate_name)
    }
}

pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub async fn read_image_base64(path: &Path) -> Result<String> {
    let buffer = tokio::fs::read(path)
        .await
        .map_err(|source| RevelioError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Read {} bytes from {}", buffer.len(), path.display());
    Ok(encode_image(&buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_filters_default_to_warn() {
        assert_eq!(log_filters("revelio", None), "revelio=warn");
        assert_eq!(
            log_filters("revelio_cli", None),
            "revelio_cli=warn,revelio=warn"
        );
        assert_eq!(log_filters("revelio", Some("  ".to_string())), "revelio=warn");
    }

    #[test]
    fn test_rust_log_replaces_defaults() {
        assert_eq!(log_filters("revelio", Some("debug".to_string())), "debug");
        assert_eq!(
            log_filters("revelio", Some("revelio::dispatch=trace".to_string())),
            "revelio::dispatch=trace"
        );
    }

    #[test]
    fn test_encode_image_uses_padded_standard_alphabet() {
        assert_eq!(encode_image(b""), "");
        assert_eq!(encode_image(b"f"), "Zg==");
        assert_eq!(encode_image(&[0xfb, 0xff, 0xfe]), "+//+");
    }

    #[tokio::test]
    async fn test_read_image_base64() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x89PNG\r\n").unwrap();

        let encoded = read_image_base64(file.path()).await.unwrap();
        assert_eq!(encoded, "iVBORw0K");
    }

    #[tokio::test]
    async fn test_read_image_base64_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");

        let err = read_image_base64(&missing).await.unwrap_err();
        match err {
            RevelioError::FileRead { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
