use url::Url;

use crate::domain::error::DomainError;

/// Base URL of the asset host that serves uploaded media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOrigin(String);

impl AssetOrigin {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let url = Url::parse(value.trim()).map_err(|err| {
            DomainError::validation(format!("asset origin `{value}` is not a valid URL: {err}"))
        })?;
        Self::from_url(&url)
    }

    pub fn from_url(url: &Url) -> Result<Self, DomainError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::validation(format!(
                "asset origin `{url}` must use http or https"
            )));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(DomainError::validation(format!(
                "asset origin `{url}` must include a host"
            )));
        }

        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix `src` with the origin unless it already is an absolute URL.
    pub fn resolve(&self, src: &str) -> String {
        if is_absolute_url(src) {
            return src.to_string();
        }

        let path = src.trim_start_matches('/');
        format!("{}/{path}", self.0)
    }
}

/// Resolve an image source against an optional origin.
pub(crate) fn resolve_src(origin: Option<&AssetOrigin>, src: &str) -> String {
    match origin {
        Some(origin) => origin.resolve(src),
        None => src.to_string(),
    }
}

pub(crate) fn is_absolute_url(src: &str) -> bool {
    src.starts_with("//") || Url::parse(src).is_ok()
}
