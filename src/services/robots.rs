use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerRule {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerPolicy {
    pub rules: Vec<CrawlerRule>,
    pub sitemap: String,
}

impl CrawlerPolicy {
    /// Public pages are crawlable; API and admin routes are not.
    pub fn for_site(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            rules: vec![CrawlerRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: vec!["/api/".to_string(), "/admin/".to_string()],
            }],
            sitemap: format!("{}/sitemap.xml", base),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let _ = writeln!(out, "User-Agent: {}", rule.user_agent);
            for path in &rule.allow {
                let _ = writeln!(out, "Allow: {}", path);
            }
            for path in &rule.disallow {
                let _ = writeln!(out, "Disallow: {}", path);
            }
            out.push('\n');
        }
        let _ = writeln!(out, "Sitemap: {}", self.sitemap);
        out
    }
}
