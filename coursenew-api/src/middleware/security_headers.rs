//! Security response headers
//!
//! Applies the browser hardening headers the API sends with every response,
//! using `tower_http::set_header::SetResponseHeaderLayer`. Headers a handler
//! already set are left alone.

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityHeadersConfig;

/// Apply security headers to the router based on configuration
pub fn apply_security_headers(mut app: Router, config: &SecurityHeadersConfig) -> Router {
    if !config.enabled {
        return app;
    }

    if config.x_content_type_options {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));
    }

    if !config.x_frame_options.is_empty() {
        if let Ok(hv) = HeaderValue::from_str(&config.x_frame_options) {
            app = app.layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                hv,
            ));
        }
    }

    // 0 disables the legacy browser XSS auditor
    if config.x_xss_protection {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ));
    }

    if !config.referrer_policy.is_empty() {
        if let Ok(hv) = HeaderValue::from_str(&config.referrer_policy) {
            app = app.layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                hv,
            ));
        }
    }

    app
}
