//! Request extractors

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Request body extractor for the users resource
///
/// Accepts `application/json` and `application/x-www-form-urlencoded` bodies.
/// A missing or blank body yields `T::default()`, so the handler decides what
/// an empty request means. Rejections render the API envelope: oversized
/// bodies become 413, anything unreadable a 400 `Invalid request body`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiBody<T>(pub T);

impl<T, S> FromRequest<S> for ApiBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::of(req.headers());

        if kind == BodyKind::Form {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state).await?;
        if bytes.trim_ascii().is_empty() {
            return Ok(Self(T::default()));
        }

        if kind != BodyKind::Json {
            return Err(Error::invalid_body(
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(Self(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return Self::Other;
        };

        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else if essence == "application/json"
            || (essence.starts_with("application/") && essence.ends_with("+json"))
        {
            Self::Json
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::HeaderValue};
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Payload {
        name: Option<String>,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn extract(req: Request) -> Result<Payload, Error> {
        ApiBody::<Payload>::from_request(req, &()).await.map(|ApiBody(p)| p)
    }

    #[test]
    fn test_body_kind_from_content_type() {
        let mut headers = HeaderMap::new();
        assert_eq!(BodyKind::of(&headers), BodyKind::Other);

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        assert_eq!(BodyKind::of(&headers), BodyKind::Json);

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/merge-patch+json"));
        assert_eq!(BodyKind::of(&headers), BodyKind::Json);

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("Application/X-WWW-Form-Urlencoded"));
        assert_eq!(BodyKind::of(&headers), BodyKind::Form);

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(BodyKind::of(&headers), BodyKind::Other);
    }

    #[tokio::test]
    async fn test_missing_body_is_default() {
        assert_eq!(extract(request(None, "")).await.unwrap(), Payload::default());
        assert_eq!(
            extract(request(Some("application/json"), "  \n")).await.unwrap(),
            Payload::default()
        );
    }

    #[tokio::test]
    async fn test_json_and_form_bodies() {
        let json = extract(request(Some("application/json"), r#"{"name":"A"}"#))
            .await
            .unwrap();
        assert_eq!(json.name.as_deref(), Some("A"));

        let form = extract(request(Some("application/x-www-form-urlencoded"), "name=B%20C"))
            .await
            .unwrap();
        assert_eq!(form.name.as_deref(), Some("B C"));
    }

    #[tokio::test]
    async fn test_unreadable_bodies_are_bad_requests() {
        let err = extract(request(Some("text/plain"), "name=A")).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { ref error, .. } if error == "Invalid request body"));

        let err = extract(request(Some("application/json"), "{\"name\":")).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));
    }
}
