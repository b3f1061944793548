//! HTML body of the "new products" newsletter campaign.
//!
//! Rendered with Askama; every interpolated value is HTML-escaped by the
//! template engine.

use askama::Template;

pub const DEFAULT_SUBJECT: &str = "NuThings'de Yeni Ürünler";

#[derive(Debug, Clone)]
pub struct CampaignProduct {
    pub title: String,
    pub description: String,
    /// Price in cents.
    pub price: i64,
    pub image: Option<String>,
    pub url: String,
}

/// `1250` → `"12,50"`.
pub fn format_euros(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{},{:02}", cents / 100, cents % 100)
}

/// One product row as the template sees it.
struct ProductRow<'a> {
    title: &'a str,
    description: &'a str,
    price: String,
    image: Option<&'a str>,
    url: &'a str,
}

#[derive(Template)]
#[template(path = "email/new_products.html")]
struct NewProductsEmailHtml<'a> {
    subject: &'a str,
    intro: Option<&'a str>,
    logo_url: &'a str,
    products: Vec<ProductRow<'a>>,
    year: i32,
}

pub fn new_products_email(
    products: &[CampaignProduct],
    subject: &str,
    intro: Option<&str>,
    logo_url: &str,
    year: i32,
) -> Result<String, askama::Error> {
    let products = products
        .iter()
        .map(|p| ProductRow {
            title: &p.title,
            description: &p.description,
            price: format_euros(p.price),
            image: p.image.as_deref().filter(|url| !url.trim().is_empty()),
            url: &p.url,
        })
        .collect();

    NewProductsEmailHtml {
        subject,
        intro: intro.map(str::trim).filter(|text| !text.is_empty()),
        logo_url,
        products,
        year,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walnut() -> CampaignProduct {
        CampaignProduct {
            title: "Walnut <Premium>".to_string(),
            description: "Kid's favourite & more".to_string(),
            price: 1250,
            image: Some("https://cdn.example/w.jpg".to_string()),
            url: "https://nut-things.com/product/1".to_string(),
        }
    }

    fn render(products: &[CampaignProduct], subject: &str, intro: Option<&str>) -> String {
        new_products_email(products, subject, intro, "https://logo", 2026).expect("render")
    }

    #[test]
    fn formats_cents_as_euros() {
        assert_eq!(format_euros(1250), "12,50");
        assert_eq!(format_euros(5), "0,05");
        assert_eq!(format_euros(-199), "-1,99");
    }

    #[test]
    fn escapes_product_text() {
        let html = render(&[walnut()], "New & fresh", None);
        assert!(html.contains("Walnut &lt;Premium&gt;"));
        assert!(html.contains("Kid&#39;s favourite &amp; more"));
        assert!(html.contains("<title>New &amp; fresh</title>"));
        assert!(html.contains("12,50 €"));
        assert!(html.contains("© 2026 NuThings"));
        assert!(!html.contains("<Premium>"));
    }

    #[test]
    fn attribute_values_cannot_break_out() {
        let mut product = walnut();
        product.url = "https://x\" onclick=\"steal()".to_string();
        let html = render(&[product], "S", None);
        assert!(!html.contains("\" onclick=\""));
    }

    #[test]
    fn intro_and_image_are_optional() {
        let mut product = walnut();
        product.image = None;
        let html = render(&[product], "S", Some("  "));
        assert!(!html.contains("width=\"96\""));
        assert!(!html.contains("padding:0 20px 14px"));

        let html = render(&[walnut()], "S", Some("Hello"));
        assert!(html.contains("width=\"96\""));
        assert!(html.contains(">Hello</td>"));
    }

    #[test]
    fn one_row_per_product() {
        let html = render(&[walnut(), walnut(), walnut()], "S", None);
        assert_eq!(html.matches("Ürünü İncele").count(), 3);
    }
}
