//! The single HTML page. Rendered once at startup from a template.

use minijinja::{Environment, context};
use skimlit_core::{DEMO_ABSTRACT, MAX_ABSTRACT_CHARS};

// The `.html` name turns on HTML auto-escaping for every substituted value.
const TEMPLATE_NAME: &str = "index.html";
const TEMPLATE: &str = include_str!("../assets/index.html");

pub const DEFAULT_PUBMED_URL: &str = "https://pubmed.ncbi.nlm.nih.gov/";
pub const DEFAULT_HOME_URL: &str =
    "https://portfolio-5aa32iczs-adityas-projects-d6de9cbc.vercel.app/projects/planetfall";

/// Values substituted into the page template.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub pubmed_url: String,
    pub home_url: String,
    pub demo_text: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            pubmed_url: DEFAULT_PUBMED_URL.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
            demo_text: DEMO_ABSTRACT.to_string(),
        }
    }
}

pub fn render_page(options: &PageOptions) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let tmpl = env.get_template(TEMPLATE_NAME)?;
    tmpl.render(context! {
        pubmed_url => options.pubmed_url,
        home_url => options.home_url,
        max_chars => MAX_ABSTRACT_CHARS,
        demo_text => options.demo_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_placeholders_replaced() {
        let html = render_page(&PageOptions::default()).unwrap();
        assert!(!html.contains("{{"), "unreplaced placeholder");
        assert!(html.contains("pubmed.ncbi.nlm.nih.gov"));
        assert!(html.contains("maxlength=\"10000\""));
        assert!(html.contains("UrgoClean"));
    }

    #[test]
    fn page_has_controls() {
        let html = render_page(&PageOptions::default()).unwrap();
        for needle in [
            "Get Model Metrics",
            "Get Predictions",
            "I want to use demo text",
            "I want to input some text",
            "Submit",
        ] {
            assert!(html.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn demo_text_is_escaped() {
        let html = render_page(&PageOptions {
            demo_text: "</textarea><script>alert(1)</script>".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(!html.contains("</textarea><script>"));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;alert(1)"));
    }

    #[test]
    fn link_attributes_are_escaped() {
        let html = render_page(&PageOptions {
            home_url: r#"x" onclick="alert(1)"#.into(),
            ..Default::default()
        })
        .unwrap();
        assert!(!html.contains(r#"x" onclick="#));
        assert!(html.contains("&quot;"));
    }
}
