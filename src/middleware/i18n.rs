// src/middleware/i18n.rs

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::{header, request::Parts, HeaderMap};

use crate::common::locale::Locale;

// Extrator de idioma: vem do primeiro segmento da URL (`/{locale}/...`),
// nunca de estado global. Segmento desconhecido vira o idioma padrão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Dentro de um `nest` a URI chega sem o prefixo; a original tem o idioma
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path())
            .unwrap_or_else(|| parts.uri.path());

        let segment = path.trim_start_matches('/').split('/').next().unwrap_or_default();
        Ok(RequestLocale(Locale::resolve(segment)))
    }
}

/// Escolhe o idioma da raiz `/` pelo `Accept-Language`, entre os suportados.
pub fn negotiate(headers: &HeaderMap) -> Locale {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header_str| {
            accept_language::parse(header_str)
                .iter()
                // "ar-SA" -> "ar"
                .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
                .find_map(|primary| Locale::parse(&primary))
        })
        .unwrap_or(Locale::DEFAULT)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};

    use super::*;

    async fn extract(path: &str) -> Locale {
        let (mut parts, _) = Request::get(path).body(Body::empty()).unwrap().into_parts();
        let RequestLocale(locale) = RequestLocale::from_request_parts(&mut parts, &()).await.unwrap();
        locale
    }

    #[tokio::test]
    async fn locale_comes_from_the_first_path_segment() {
        assert_eq!(extract("/ar/destinations").await, Locale::Ar);
        assert_eq!(extract("/ru").await, Locale::Ru);
        assert_eq!(extract("/de/destinations").await, Locale::En);
        assert_eq!(extract("/").await, Locale::En);
    }

    #[test]
    fn accept_language_picks_first_supported_primary_tag() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, "de-DE, ar-SA;q=0.8, en;q=0.5".parse().unwrap());
        assert_eq!(negotiate(&headers), Locale::Ar);
    }

    #[test]
    fn missing_or_unsupported_accept_language_uses_default() {
        assert_eq!(negotiate(&HeaderMap::new()), Locale::En);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, "pt-BR".parse().unwrap());
        assert_eq!(negotiate(&headers), Locale::En);
    }
}
