//! Typed view over the `settings` key/value table.
//!
//! Rows are read once at startup into [`SiteSettings`]; every admin save
//! writes all keys back and reloads the shared copy.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::richtext::ShadowPreset;
use crate::sanitize::{normalize_html, title_html};

/// Enum whose variants are stored as fixed lowercase words.
macro_rules! keyword_enum {
    ($name:ident { $($variant:ident => $word:literal),+ $(,)? } default $default:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(#[serde(rename = $word)] $variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $word),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($word => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

keyword_enum!(BgMode { White => "white", Transparent => "transparent", Image => "image" } default White);
keyword_enum!(ParallaxPosition {
    AfterHero => "after_hero",
    AfterFeatured => "after_featured",
    AfterTestimonials => "after_testimonials",
} default AfterHero);
keyword_enum!(PanelStyle { None => "none", Glass => "glass", Card => "card" } default None);
keyword_enum!(Align { Left => "left", Center => "center", Right => "right" } default Center);
keyword_enum!(UnderlineGradient { None => "none", Warm => "warm", Cool => "cool", Brand => "brand" } default None);

const DEFAULT_FONT: &str = "Inter, system-ui, sans-serif";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    pub size_px: u16,
    pub weight: u16,
    pub align: Align,
    pub line_height: String,
    pub letter_spacing: String,
    pub color: String,
    pub shadow: ShadowPreset,
}

impl TextStyle {
    fn title() -> Self {
        Self {
            font_family: DEFAULT_FONT.to_string(),
            size_px: 36,
            weight: 700,
            align: Align::Center,
            line_height: "1.25".to_string(),
            letter_spacing: "0".to_string(),
            color: "#111111".to_string(),
            shadow: ShadowPreset::None,
        }
    }

    fn message() -> Self {
        Self {
            size_px: 24,
            weight: 600,
            line_height: "1.5".to_string(),
            ..Self::title()
        }
    }

    fn read(rows: &Rows, prefix: &str, defaults: Self) -> Self {
        let key = |suffix: &str| format!("{prefix}_{suffix}");
        Self {
            font_family: rows.text(&key("font_family"), &defaults.font_family),
            size_px: rows
                .parse::<f32>(&key("size"))
                .filter(|px| px.is_finite() && (1.0..=400.0).contains(px))
                .map_or(defaults.size_px, |px| px.round() as u16),
            weight: rows
                .parse::<u16>(&key("weight"))
                .filter(valid_weight)
                .unwrap_or(defaults.weight),
            align: rows.parse(&key("align")).unwrap_or(defaults.align),
            line_height: rows.text(&key("line_height"), &defaults.line_height),
            letter_spacing: rows.text(&key("letter_spacing"), &defaults.letter_spacing),
            color: rows.text(&key("color"), &defaults.color),
            shadow: rows
                .get(&key("shadow"))
                .and_then(ShadowPreset::from_name)
                .unwrap_or(defaults.shadow),
        }
    }

    fn write(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        let mut push = |suffix: &str, value: String| out.push((format!("{prefix}_{suffix}"), value));
        push("font_family", self.font_family.clone());
        push("size", self.size_px.to_string());
        push("weight", self.weight.to_string());
        push("align", self.align.as_str().to_string());
        push("line_height", self.line_height.clone());
        push("letter_spacing", self.letter_spacing.clone());
        push("color", self.color.clone());
        push("shadow", self.shadow.as_str().to_string());
    }

    fn validate(&self, field: &str, problems: &mut Vec<String>) {
        if !(1..=400).contains(&self.size_px) {
            problems.push(format!("{field}.size_px"));
        }
        if !valid_weight(&self.weight) {
            problems.push(format!("{field}.weight"));
        }
        if self.color.trim().is_empty() {
            problems.push(format!("{field}.color"));
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::title()
    }
}

fn valid_weight(weight: &u16) -> bool {
    (100..=900).contains(weight) && weight % 100 == 0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Stored HTML or plain text.
    pub title: String,
    pub message: String,
    pub bg_mode: BgMode,
    pub bg_url: String,
    pub overlay_opacity: f32,
    pub underline_gradient: UnderlineGradient,
    pub block_align: Align,
    pub panel_style: PanelStyle,
    pub position: ParallaxPosition,
    pub title_style: TextStyle,
    pub message_style: TextStyle,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            title: "Hoş geldiniz".to_string(),
            message: String::new(),
            bg_mode: BgMode::White,
            bg_url: "/parallax.jpg".to_string(),
            overlay_opacity: 0.35,
            underline_gradient: UnderlineGradient::None,
            block_align: Align::Center,
            panel_style: PanelStyle::None,
            position: ParallaxPosition::AfterHero,
            title_style: TextStyle::title(),
            message_style: TextStyle::message(),
        }
    }
}

/// What the homepage renders for the parallax section.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParallaxBlock {
    pub title_html: String,
    pub message_html: String,
    pub bg_mode: BgMode,
    pub bg_url: String,
    pub overlay_opacity: f32,
    pub underline_gradient: UnderlineGradient,
    pub block_align: Align,
    pub panel_style: PanelStyle,
    pub position: ParallaxPosition,
    pub title_style: TextStyle,
    pub message_style: TextStyle,
}

impl ParallaxSettings {
    pub fn render(&self) -> ParallaxBlock {
        ParallaxBlock {
            title_html: title_html(&self.title),
            message_html: normalize_html(&self.message),
            bg_mode: self.bg_mode,
            bg_url: self.bg_url.clone(),
            overlay_opacity: self.overlay_opacity,
            underline_gradient: self.underline_gradient,
            block_align: self.block_align,
            panel_style: self.panel_style,
            position: self.position,
            title_style: self.title_style.clone(),
            message_style: self.message_style.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SocialLinks {
    pub instagram: String,
    pub twitter: String,
    pub email: String,
    pub phone: String,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            instagram: "https://instagram.com".to_string(),
            twitter: "https://twitter.com".to_string(),
            email: "info@nut-things.com".to_string(),
            phone: "+49 172 8891010".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ShippingInfo {
    pub area: String,
    pub time: String,
    pub costs: String,
    pub payment_methods: Vec<String>,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            area: "Deutschland".to_string(),
            time: "2–4 Werktage".to_string(),
            costs: "4,90 € pauschal – ab 49 € frei".to_string(),
            payment_methods: vec!["PayPal".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LegalInfo {
    pub company_name: String,
    pub address_street: String,
    pub address_zipcity: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub register: String,
    pub vat_id: String,
    pub content_responsible: String,
    pub privacy_controller_name: String,
    pub privacy_controller_address: String,
    pub privacy_controller_email: String,
    pub withdrawal_company: String,
    pub withdrawal_address: String,
    pub withdrawal_email: String,
}

impl LegalInfo {
    fn fields(&self) -> [(&'static str, &String); 14] {
        [
            ("legal_company_name", &self.company_name),
            ("legal_address_street", &self.address_street),
            ("legal_address_zipcity", &self.address_zipcity),
            ("legal_contact_phone", &self.contact_phone),
            ("legal_contact_email", &self.contact_email),
            ("legal_register", &self.register),
            ("legal_vat_id", &self.vat_id),
            ("legal_content_responsible", &self.content_responsible),
            ("privacy_controller_name", &self.privacy_controller_name),
            ("privacy_controller_address", &self.privacy_controller_address),
            ("privacy_controller_email", &self.privacy_controller_email),
            ("withdrawal_company", &self.withdrawal_company),
            ("withdrawal_address", &self.withdrawal_address),
            ("withdrawal_email", &self.withdrawal_email),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SiteSettings {
    pub home_seo_title: String,
    pub home_seo_desc: String,
    pub home_show_featured: bool,
    pub home_show_most_liked: bool,
    pub parallax: ParallaxSettings,
    pub social: SocialLinks,
    pub shipping: ShippingInfo,
    pub legal: LegalInfo,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            home_seo_title: "NuThings".to_string(),
            home_seo_desc: "Frische Nüsse, türkischer Honig und mehr.".to_string(),
            home_show_featured: true,
            home_show_most_liked: true,
            parallax: ParallaxSettings::default(),
            social: SocialLinks::default(),
            shipping: ShippingInfo::default(),
            legal: LegalInfo::default(),
        }
    }
}

/// Trimmed, non-empty values by key.
struct Rows(HashMap<String, String>);

impl Rows {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn text(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key)?.parse().ok()
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }
}

/// Keys the rich-text editor is allowed to write.
pub const RICH_TEXT_KEYS: [&str; 2] = ["parallax_title", "parallax_message"];

impl SiteSettings {
    /// Unknown keys are ignored; empty or unparsable values use the default.
    pub fn from_rows<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let rows = Rows(
            rows.into_iter()
                .filter_map(|(key, value)| {
                    let value = value?.as_ref().trim().to_string();
                    (!value.is_empty()).then(|| (key.into(), value))
                })
                .collect(),
        );
        let d = SiteSettings::default();
        let dp = &d.parallax;

        let overlay_opacity = rows
            .parse::<f32>("parallax_overlay_opacity")
            .filter(|v| v.is_finite() && (0.0..=1.0).contains(v) && *v != 0.0)
            .unwrap_or(dp.overlay_opacity);

        let payment_methods: Vec<String> = rows
            .get("payment_methods")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .filter(|methods: &Vec<String>| !methods.is_empty())
            .unwrap_or_else(|| d.shipping.payment_methods.clone());

        let legal_text = |key: &str| rows.text(key, "");

        Self {
            home_seo_title: rows.text("home_seo_title", &d.home_seo_title),
            home_seo_desc: rows.text("home_seo_desc", &d.home_seo_desc),
            home_show_featured: rows.flag("home_show_featured", d.home_show_featured),
            home_show_most_liked: rows.flag("home_show_most_liked", d.home_show_most_liked),
            parallax: ParallaxSettings {
                title: rows.text("parallax_title", &dp.title),
                message: rows.text("parallax_message", &dp.message),
                bg_mode: rows.parse("parallax_bg_mode").unwrap_or(dp.bg_mode),
                bg_url: rows.text("parallax_bg_url", &dp.bg_url),
                overlay_opacity,
                underline_gradient: rows
                    .parse("parallax_underline_gradient")
                    .unwrap_or(dp.underline_gradient),
                block_align: rows.parse("parallax_block_align").unwrap_or(dp.block_align),
                panel_style: rows.parse("parallax_panel_style").unwrap_or(dp.panel_style),
                position: rows.parse("parallax_position").unwrap_or(dp.position),
                title_style: TextStyle::read(&rows, "parallax_title", TextStyle::title()),
                message_style: TextStyle::read(&rows, "parallax_message", TextStyle::message()),
            },
            social: SocialLinks {
                instagram: rows.text("social_instagram", &d.social.instagram),
                twitter: rows.text("social_twitter", &d.social.twitter),
                email: rows.text("social_email", &d.social.email),
                phone: rows.text("social_phone", &d.social.phone),
            },
            shipping: ShippingInfo {
                area: rows.text("shipping_area", &d.shipping.area),
                time: rows.text("shipping_time", &d.shipping.time),
                costs: rows.text("shipping_costs", &d.shipping.costs),
                payment_methods,
            },
            legal: LegalInfo {
                company_name: legal_text("legal_company_name"),
                address_street: legal_text("legal_address_street"),
                address_zipcity: legal_text("legal_address_zipcity"),
                contact_phone: legal_text("legal_contact_phone"),
                contact_email: legal_text("legal_contact_email"),
                register: legal_text("legal_register"),
                vat_id: legal_text("legal_vat_id"),
                content_responsible: legal_text("legal_content_responsible"),
                privacy_controller_name: legal_text("privacy_controller_name"),
                privacy_controller_address: legal_text("privacy_controller_address"),
                privacy_controller_email: legal_text("privacy_controller_email"),
                withdrawal_company: legal_text("withdrawal_company"),
                withdrawal_address: legal_text("withdrawal_address"),
                withdrawal_email: legal_text("withdrawal_email"),
            },
        }
    }

    /// Every key with its stored form, ready for an upsert.
    pub fn to_rows(&self) -> Vec<(String, String)> {
        let p = &self.parallax;
        let mut out: Vec<(String, String)> = vec![
            ("home_seo_title".into(), self.home_seo_title.clone()),
            ("home_seo_desc".into(), self.home_seo_desc.clone()),
            ("home_show_featured".into(), self.home_show_featured.to_string()),
            ("home_show_most_liked".into(), self.home_show_most_liked.to_string()),
            ("parallax_title".into(), p.title.clone()),
            ("parallax_message".into(), p.message.clone()),
            ("parallax_bg_mode".into(), p.bg_mode.as_str().into()),
            ("parallax_bg_url".into(), p.bg_url.clone()),
            ("parallax_overlay_opacity".into(), p.overlay_opacity.to_string()),
            ("parallax_underline_gradient".into(), p.underline_gradient.as_str().into()),
            ("parallax_block_align".into(), p.block_align.as_str().into()),
            ("parallax_panel_style".into(), p.panel_style.as_str().into()),
            ("parallax_position".into(), p.position.as_str().into()),
            ("social_instagram".into(), self.social.instagram.clone()),
            ("social_twitter".into(), self.social.twitter.clone()),
            ("social_email".into(), self.social.email.clone()),
            ("social_phone".into(), self.social.phone.clone()),
            ("shipping_area".into(), self.shipping.area.clone()),
            ("shipping_time".into(), self.shipping.time.clone()),
            ("shipping_costs".into(), self.shipping.costs.clone()),
            ("payment_methods".into(), self.shipping.payment_methods.join(", ")),
        ];
        p.title_style.write("parallax_title", &mut out);
        p.message_style.write("parallax_message", &mut out);
        out.extend(
            self.legal
                .fields()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.clone())),
        );
        out
    }

    /// Field paths that fail validation; empty when the settings can be saved.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let p = &self.parallax;
        if !p.overlay_opacity.is_finite() || !(0.0..=1.0).contains(&p.overlay_opacity) {
            problems.push("parallax.overlay_opacity".to_string());
        }
        if p.bg_mode == BgMode::Image && p.bg_url.trim().is_empty() {
            problems.push("parallax.bg_url".to_string());
        }
        p.title_style.validate("parallax.title_style", &mut problems);
        p.message_style.validate("parallax.message_style", &mut problems);
        problems
    }

    /// Raw stored value of a rich-text key.
    pub fn rich_text(&self, key: &str) -> Option<&str> {
        match key {
            "parallax_title" => Some(&self.parallax.title),
            "parallax_message" => Some(&self.parallax.message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, &str)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn empty_table_gives_defaults() {
        let settings = SiteSettings::from_rows(Vec::<(String, Option<String>)>::new());
        assert_eq!(settings, SiteSettings::default());
        assert!(settings.home_show_featured);
        assert_eq!(settings.parallax.overlay_opacity, 0.35);
        assert_eq!(settings.parallax.message_style.size_px, 24);
    }

    #[test]
    fn reads_and_trims_values() {
        let settings = SiteSettings::from_rows(rows(&[
            ("home_show_featured", "false"),
            ("parallax_bg_mode", " image "),
            ("parallax_position", "after_testimonials"),
            ("parallax_title_size", "48"),
            ("parallax_title_shadow", "glow"),
            ("payment_methods", "PayPal, Vorkasse,,"),
            ("unknown_key", "ignored"),
        ]));
        assert!(!settings.home_show_featured);
        assert_eq!(settings.parallax.bg_mode, BgMode::Image);
        assert_eq!(settings.parallax.position, ParallaxPosition::AfterTestimonials);
        assert_eq!(settings.parallax.title_style.size_px, 48);
        assert_eq!(settings.parallax.title_style.shadow, ShadowPreset::Glow);
        assert_eq!(settings.shipping.payment_methods, vec!["PayPal", "Vorkasse"]);
    }

    #[test]
    fn invalid_values_fall_back() {
        let settings = SiteSettings::from_rows(rows(&[
            ("parallax_overlay_opacity", "7"),
            ("parallax_panel_style", "neon"),
            ("parallax_message_weight", "650"),
            ("parallax_title", "   "),
        ]));
        assert_eq!(settings.parallax.overlay_opacity, 0.35);
        assert_eq!(settings.parallax.panel_style, PanelStyle::None);
        assert_eq!(settings.parallax.message_style.weight, 600);
        assert_eq!(settings.parallax.title, "Hoş geldiniz");
    }

    #[test]
    fn null_values_are_absent() {
        let settings =
            SiteSettings::from_rows(vec![("home_seo_title".to_string(), None::<String>)]);
        assert_eq!(settings.home_seo_title, "NuThings");
    }

    #[test]
    fn rows_read_back_identically() {
        let mut settings = SiteSettings::default();
        settings.parallax.panel_style = PanelStyle::Glass;
        settings.parallax.message_style.letter_spacing = "0.05em".into();
        settings.legal.vat_id = "DE123".into();
        let rows: Vec<(String, Option<String>)> = settings
            .to_rows()
            .into_iter()
            .map(|(k, v)| (k, Some(v)))
            .collect();
        assert_eq!(SiteSettings::from_rows(rows), settings);
    }

    #[test]
    fn validation_reports_bad_fields() {
        let mut settings = SiteSettings::default();
        assert!(settings.validate().is_empty());
        settings.parallax.overlay_opacity = 1.5;
        settings.parallax.title_style.weight = 50;
        assert_eq!(
            settings.validate(),
            vec!["parallax.overlay_opacity", "parallax.title_style.weight"]
        );
    }

    #[test]
    fn parallax_block_sanitizes_html() {
        let mut settings = SiteSettings::default();
        settings.parallax.message = "<p onclick=\"x()\">Hi</p><script>bad</script>".into();
        let block = settings.parallax.render();
        assert_eq!(block.message_html, "<p>Hi</p>bad");
        assert_eq!(block.title_html, "<span>Hoş geldiniz</span>");
    }
}
