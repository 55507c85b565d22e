use crate::error::CrawlError;
use url::{ParseError, Url};

/// Path extensions that still point at a web page.
pub const PAGE_EXTENSIONS: [&str; 6] = ["html", "htm", "xhtml", "xht", "xml", "php"];

/// The normalized homepage. Doubles as the prefix every in-site URL must
/// carry and as the base that relative references resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomain {
    base: Url,
    prefix: String,
}

impl AllowedDomain {
    /// Normalizes a homepage address: `http` is assumed when no scheme is
    /// given, query and fragment are dropped, and the path is cut back to
    /// the top directory (`/`).
    pub fn from_homepage(address: &str) -> Result<Self, CrawlError> {
        let address = address.trim();
        let invalid = |reason: String| CrawlError::InvalidHomepage {
            url: address.to_string(),
            reason,
        };

        let with_scheme = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        let mut base = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        if base.host_str().is_none() {
            return Err(invalid("no host".to_string()));
        }

        base.set_query(None);
        base.set_fragment(None);
        base.set_path("/");

        let prefix = base.to_string();
        Ok(Self { base, prefix })
    }

    /// The homepage URL, always ending in `/`.
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    pub fn robots_txt_url(&self) -> String {
        self.base
            .join("/robots.txt")
            .map(String::from)
            .unwrap_or_else(|_| format!("{}robots.txt", self.prefix))
    }

    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }

    /// Makes a raw `href` absolute and canonical.
    ///
    /// Relative references resolve against the homepage. The fragment is
    /// dropped, and a trailing slash is added when the path carries neither
    /// a file extension nor a query string. Returns `None` for references
    /// that cannot form a URL at all.
    pub fn normalize_reference(&self, href: &str) -> Option<String> {
        let href = href.trim();
        let mut url = match Url::parse(href) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => self.base.join(href).ok()?,
            Err(_) => return None,
        };

        // mailto:, javascript: and friends are left alone; the domain check
        // throws them out.
        if !matches!(url.scheme(), "http" | "https") {
            return Some(url.to_string());
        }

        url.set_fragment(None);
        if url.query().is_none() && file_extension(url.path()).is_none() && !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Some(url.to_string())
    }
}

/// Extension of the last path segment, if it has one.
pub fn file_extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or_default();
    segment
        .rfind('.')
        .map(|dot| &segment[dot + 1..])
}

/// True when the URL's path has no extension or one of [`PAGE_EXTENSIONS`].
pub fn has_page_extension(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => return false,
    };
    match file_extension(&path) {
        None => true,
        Some(extension) => PAGE_EXTENSIONS.contains(&extension),
    }
}
