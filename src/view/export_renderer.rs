use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::content::Term;
use crate::content_query::Terms;

#[derive(ramhorns::Content)]
struct ExportPage<'a> {
    nonce: &'a str,
    default_file_name: &'a str,
    tags: Vec<ViewTerm<'a>>,
    categories: Vec<ViewTerm<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewTerm<'a> {
    name: &'a str,
    slug: &'a str,
}

/// The export filter form
pub struct ExportRenderer<'a> {
    pub template: Template<'a>,
}

impl ExportRenderer<'_> {
    pub fn new(export_tpl_src: &str) -> io::Result<ExportRenderer> {
        let template = match Template::new(export_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing export template: {}", e)));
            }
        };

        Ok(ExportRenderer {
            template,
        })
    }

    pub fn render(&self, terms: &Terms, nonce: &str, default_file_name: &str) -> String {
        self.template.render(&ExportPage {
            nonce,
            default_file_name,
            tags: view_terms(&terms.tags),
            categories: view_terms(&terms.categories),
        })
    }
}

fn view_terms(terms: &[Term]) -> Vec<ViewTerm> {
    terms.iter()
        .map(|t| ViewTerm { name: t.name.as_str(), slug: t.slug.as_str() })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::view::{read_template, EXPORT_TEMPLATE};

    use super::*;

    fn terms() -> Terms {
        Terms {
            tags: vec![Term::from_name("rust")],
            categories: vec![Term::from_name("News"), Term::from_name("Rust & Co")],
        }
    }

    #[test]
    fn render_form() {
        let template_src = r##"NONCE=[{{nonce}}]
FILE=[{{default_file_name}}]
TAGS=[{{#tags}}({{slug}}:{{name}}){{/tags}}]
CATEGORIES=[{{#categories}}({{slug}}:{{name}}){{/categories}}]"##;
        let renderer = ExportRenderer::new(template_src).unwrap();
        let res = renderer.render(&terms(), "abc-123", "2024-07-04.zip");
        assert_eq!(res, r##"NONCE=[abc-123]
FILE=[2024-07-04.zip]
TAGS=[(rust:rust)]
CATEGORIES=[(news:News)(rust-co:Rust &amp; Co)]"##);
    }

    #[test]
    fn render_builtin_form() {
        let src = read_template(None, EXPORT_TEMPLATE).unwrap();
        let renderer = ExportRenderer::new(&src).unwrap();
        let res = renderer.render(&terms(), "nonce-value", "2024-07-04.zip");
        assert!(res.contains(r#"name="export_nonce" value="nonce-value""#));
        assert!(res.contains(r#"<option value="news">News</option>"#));
        assert!(res.contains(r#"placeholder="2024-07-04.zip""#));
    }
}
