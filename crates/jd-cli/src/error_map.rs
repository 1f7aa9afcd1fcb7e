use jd_core::JabdoriError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> JabdoriError {
    JabdoriError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: JabdoriError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_string(&error.message));
    1
}

pub(crate) fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

pub(crate) fn map_tui_io(error: std::io::Error) -> JabdoriError {
    map_error("TUI_IO", error)
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> JabdoriError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_scan(error: std::path::StripPrefixError) -> JabdoriError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> JabdoriError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_store_write(error: std::io::Error) -> JabdoriError {
    map_error("CLI_STORE_WRITE", error)
}

pub(crate) fn map_cli_store_read(error: std::io::Error) -> JabdoriError {
    map_error("CLI_STORE_READ", error)
}

pub(crate) fn map_cli_store_encode(error: serde_json::Error) -> JabdoriError {
    map_error("CLI_STORE_ENCODE", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(JabdoriError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn json_string_escapes_line_breaks_and_quotes() {
        assert_eq!(json_string("a\n\"b\""), r#""a\n\"b\"""#);
        assert_eq!(json_string("잡도리"), "\"잡도리\"");
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(map_tui_io(std::io::Error::other("io")).code, "TUI_IO");
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );

        let strip_error = std::path::Path::new("/a")
            .strip_prefix("/b")
            .expect_err("strip prefix");
        assert_eq!(map_cli_source_scan(strip_error).code, "CLI_SOURCE_SCAN");

        assert_eq!(
            map_cli_source_read(std::io::Error::other("read")).code,
            "CLI_SOURCE_READ"
        );
        assert_eq!(
            map_cli_store_write(std::io::Error::other("write")).code,
            "CLI_STORE_WRITE"
        );
        assert_eq!(
            map_cli_store_read(std::io::Error::other("read")).code,
            "CLI_STORE_READ"
        );

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_store_encode(invalid).code, "CLI_STORE_ENCODE");
    }
}
