//! `robots.txt` and `sitemap.xml` bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;

const ALLOWED: [&str; 3] = ["/", "/auth/login", "/auth/register"];
const DISALLOWED: [&str; 4] = ["/auth/reset", "/dashboard", "/admin", "/api"];

struct SitemapEntry {
    path: &'static str,
    change_frequency: &'static str,
    priority: &'static str,
}

const SITEMAP: [SitemapEntry; 3] = [
    SitemapEntry {
        path: "/",
        change_frequency: "weekly",
        priority: "1.0",
    },
    SitemapEntry {
        path: "/auth/login",
        change_frequency: "monthly",
        priority: "0.8",
    },
    SitemapEntry {
        path: "/auth/register",
        change_frequency: "monthly",
        priority: "0.8",
    },
];

fn origin(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

#[must_use]
pub fn robots_txt(base_url: &str) -> String {
    let mut body = String::from("User-agent: *\n");
    for path in ALLOWED {
        let _ = writeln!(body, "Allow: {path}");
    }
    for path in DISALLOWED {
        let _ = writeln!(body, "Disallow: {path}");
    }
    let _ = write!(
        body,
        "\n# Sitemap\nSitemap: {}/sitemap.xml\n\n# Crawl-delay for politeness\nCrawl-delay: 1",
        origin(base_url)
    );
    body
}

#[must_use]
pub fn sitemap_xml(base_url: &str, last_modified: DateTime<Utc>) -> String {
    let domain = origin(base_url);
    let lastmod = last_modified.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">",
    );
    for entry in &SITEMAP {
        let _ = write!(
            body,
            "\n  <url>\n    <loc>{domain}{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>",
            entry.path, entry.change_frequency, entry.priority
        );
    }
    body.push_str("\n</urlset>");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn robots_lists_rules_and_sitemap() {
        let body = robots_txt("https://sso.heapmind.dev/");

        assert!(body.starts_with("User-agent: *\nAllow: /\n"));
        assert!(body.contains("Allow: /auth/register\n"));
        assert!(body.contains("Disallow: /auth/reset\n"));
        assert!(body.contains("Disallow: /api\n"));
        assert!(body.contains("Sitemap: https://sso.heapmind.dev/sitemap.xml\n"));
        assert!(body.ends_with("Crawl-delay: 1"));
    }

    #[test]
    fn sitemap_has_three_urls() {
        let when = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).single();
        let Some(when) = when else {
            panic!("valid timestamp");
        };
        let body = sitemap_xml("http://localhost:5173", when);

        assert_eq!(body.matches("<url>").count(), 3);
        assert!(body.contains("<loc>http://localhost:5173/</loc>"));
        assert!(body.contains("<loc>http://localhost:5173/auth/login</loc>"));
        assert!(body.contains("<lastmod>2025-01-02T03:04:05.000Z</lastmod>"));
        assert!(body.contains("<priority>1.0</priority>"));
        assert!(!body.contains("/auth/reset"));
        assert!(body.ends_with("</urlset>"));
    }
}
