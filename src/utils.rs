// src/utils.rs
use web_sys::window;

/// Get the base URL for the application.
/// This handles both local development and GitHub Pages deployment.
pub fn get_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(location) = window.location().pathname() {
            return base_for_path(&location).to_string();
        }
    }
    // Local development - no base path needed
    String::new()
}

fn base_for_path(pathname: &str) -> &'static str {
    // Check if we're on GitHub Pages (path starts with /tour-viewer/)
    if pathname.starts_with("/tour-viewer/") {
        "/tour-viewer"
    } else {
        ""
    }
}

/// Build a resource URL with the correct base path
pub fn resource_url(path: &str) -> String {
    let base = get_base_url();
    let clean_path = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", clean_path)
    } else {
        format!("{}/{}", base, clean_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_for_path() {
        assert_eq!(base_for_path("/tour-viewer/index.html"), "/tour-viewer");
        assert_eq!(base_for_path("/"), "");
        assert_eq!(base_for_path("/somewhere/else"), "");
    }
}
