use crate::services::robots::CrawlerPolicy;
use crate::services::upload::UploadSigner;
use crate::{Config, Database};
use anyhow::Result;
use std::sync::Arc;
use tera::Tera;

pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Database>,
    pub templates: Tera,
    pub signer: UploadSigner,
    pub robots: CrawlerPolicy,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn Database>) -> Result<Self> {
        let mut templates = Tera::default();

        templates.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("public/index.html", include_str!("../../templates/public/index.html")),
            ("public/404.html", include_str!("../../templates/public/404.html")),
        ])?;

        let signer = UploadSigner::new(&config.media);
        let robots = CrawlerPolicy::for_site(&config.site.url);

        Ok(Self {
            config,
            db,
            templates,
            signer,
            robots,
        })
    }

    pub fn session_cookie(&self) -> &str {
        &self.config.auth.session_cookie
    }
}
