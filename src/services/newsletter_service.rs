use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    audit,
    dto::newsletter::{
        CampaignRequest, CampaignResult, OkResponse, RecipientError, SubscribeRequest,
        SubscriberList,
    },
    email::{CampaignProduct, DEFAULT_SUBJECT, new_products_email},
    entity::{
        newsletter_subscribers::{Column as SubCol, Entity as Subscribers, Model as SubscriberModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    i18n::Locale,
    mail::{MailError, Mailer, OutgoingMail},
    middleware::auth::AuthUser,
    models::NewsletterSubscriber,
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, SubscriberQuery},
    state::AppState,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Trimmed, lowercased address, or `None` when it does not look like an email.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    EMAIL_RE.is_match(&email).then_some(email)
}

pub async fn subscribe(
    state: &AppState,
    payload: SubscribeRequest,
    ip: Option<String>,
    user_agent: Option<String>,
) -> AppResult<OkResponse> {
    let email = normalize_email(&payload.email)
        .ok_or_else(|| AppError::BadRequest("invalid_email".into()))?;
    let locale = payload
        .locale
        .as_deref()
        .and_then(|l| l.parse::<Locale>().ok())
        .unwrap_or_default();

    sqlx::query(
        r#"
        INSERT INTO newsletter_subscribers (id, email, locale, consent, consent_at, ip, user_agent)
        VALUES ($1, $2, $3, TRUE, now(), $4, $5)
        ON CONFLICT (email) DO UPDATE
        SET locale = EXCLUDED.locale,
            consent = TRUE,
            consent_at = EXCLUDED.consent_at,
            ip = EXCLUDED.ip,
            user_agent = EXCLUDED.user_agent
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(locale.as_str())
    .bind(ip)
    .bind(user_agent)
    .execute(&state.pool)
    .await?;

    tracing::info!(locale = %locale, "newsletter subscription stored");
    Ok(OkResponse { ok: true })
}

pub async fn list_subscribers(
    state: &AppState,
    query: SubscriberQuery,
) -> AppResult<ApiResponse<SubscriberList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Subscribers::find();
    if let Some(verified) = query.verified {
        finder = finder.filter(SubCol::Verified.eq(verified));
    }
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(SubCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(SubCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(subscriber_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Subscribers", SubscriberList { items }, Some(meta)))
}

pub async fn subscribers_csv(state: &AppState) -> AppResult<String> {
    let subscribers: Vec<NewsletterSubscriber> = Subscribers::find()
        .order_by_desc(SubCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(subscriber_from_entity)
        .collect();
    Ok(subscribers_to_csv(&subscribers))
}

pub fn subscribers_to_csv(subscribers: &[NewsletterSubscriber]) -> String {
    let mut out = String::from("email,locale,consent_at,verified\n");
    for s in subscribers {
        let consent_at = s.consent_at.map(|at| at.to_rfc3339()).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&s.email),
            csv_field(&s.locale),
            consent_at,
            s.verified
        ));
    }
    out
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Renders the selected products once and mails every verified subscriber in turn.
/// A failing recipient is recorded and the loop moves on.
pub async fn send_campaign(
    state: &AppState,
    user: &AuthUser,
    payload: CampaignRequest,
) -> AppResult<CampaignResult> {
    if payload.product_ids.is_empty() {
        return Err(AppError::BadRequest("EMPTY_PRODUCT_IDS".into()));
    }
    if !state.mailer.is_configured() {
        return Err(MailError::NotConfigured.into());
    }

    let subject = payload
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUBJECT)
        .to_string();

    let site_url = state.config.site_url.as_str();
    let products: Vec<CampaignProduct> = Products::find()
        .filter(ProdCol::Id.is_in(payload.product_ids.clone()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| CampaignProduct {
            title: p.name,
            description: p.description.unwrap_or_default(),
            price: p.price,
            image: p.image_url,
            url: format!("{site_url}/product/{}", p.id),
        })
        .collect();

    let html = new_products_email(
        &products,
        &subject,
        payload.intro.as_deref(),
        &state.config.mail.logo_url,
        Utc::now().year(),
    )
    .map_err(MailError::from)?;

    let recipients: Vec<String> = Subscribers::find()
        .filter(SubCol::Verified.eq(true))
        .order_by_asc(SubCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|s| s.email)
        .collect();

    let result = deliver(
        state.mailer.as_ref(),
        &state.config.mail.from,
        &subject,
        &html,
        recipients,
    )
    .await;

    audit::record(
        state,
        user,
        "newsletter_campaign",
        "newsletter_subscribers",
        serde_json::json!({
            "product_ids": payload.product_ids,
            "sent": result.sent,
            "total": result.total,
            "failed": result.errors.len(),
        }),
    )
    .await;

    Ok(result)
}

/// Sends the same mail to each recipient in order. `sent` counts only
/// responses that carry a provider id.
pub async fn deliver(
    mailer: &dyn Mailer,
    from: &str,
    subject: &str,
    html: &str,
    recipients: Vec<String>,
) -> CampaignResult {
    let total = recipients.len();
    let mut sent = 0;
    let mut errors = Vec::new();

    for to in recipients {
        let mail = OutgoingMail {
            from: from.to_string(),
            to,
            subject: subject.to_string(),
            html: html.to_string(),
        };
        match mailer.send(&mail).await {
            Ok(receipt) => {
                if receipt.id.is_some() {
                    sent += 1;
                }
            }
            Err(err) => {
                tracing::warn!(to = %mail.to, error = %err, "campaign mail failed");
                errors.push(RecipientError {
                    to: mail.to,
                    error: err.to_string(),
                });
            }
        }
    }

    CampaignResult {
        ok: errors.is_empty(),
        sent,
        total,
        errors,
    }
}

fn subscriber_from_entity(model: SubscriberModel) -> NewsletterSubscriber {
    NewsletterSubscriber {
        id: model.id,
        email: model.email,
        locale: model.locale,
        consent: model.consent,
        consent_at: model.consent_at.map(|at| at.with_timezone(&Utc)),
        verified: model.verified,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{MailFuture, RecordingMailer, SentMail};
    use chrono::TimeZone;

    /// Accepts everything but never reports a message id.
    struct AnonymousMailer;

    impl Mailer for AnonymousMailer {
        fn send<'a>(&'a self, _mail: &'a OutgoingMail) -> MailFuture<'a> {
            Box::pin(async { Ok(SentMail { id: None }) })
        }
    }

    fn recipients(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn failing_recipients_are_collected() {
        let mailer = RecordingMailer::failing_for(["bad@b.de"]);
        let result = deliver(
            &mailer,
            "shop@nut-things.com",
            "Neu",
            "<p>hi</p>",
            recipients(&["a@b.de", "bad@b.de", "c@b.de"]),
        )
        .await;

        assert!(!result.ok);
        assert_eq!(result.total, 3);
        assert_eq!(result.sent, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to, "bad@b.de");

        let delivered: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(delivered, vec!["a@b.de", "c@b.de"]);
    }

    #[tokio::test]
    async fn clean_run_is_ok() {
        let mailer = RecordingMailer::new();
        let result = deliver(&mailer, "f", "S", "h", recipients(&["a@b.de", "b@b.de"])).await;
        assert!(result.ok);
        assert_eq!((result.sent, result.total), (2, 2));
        assert!(mailer.sent().iter().all(|m| m.subject == "S" && m.from == "f"));
    }

    #[tokio::test]
    async fn receipts_without_id_are_not_counted() {
        let result = deliver(&AnonymousMailer, "f", "S", "h", recipients(&["a@b.de"])).await;
        assert!(result.ok);
        assert_eq!(result.sent, 0);
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn no_recipients_sends_nothing() {
        let result = deliver(&RecordingMailer::new(), "f", "S", "h", Vec::new()).await;
        assert!(result.ok);
        assert_eq!((result.sent, result.total), (0, 0));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ali@Example.COM "), Some("ali@example.com".into()));
        assert_eq!(normalize_email("no-at-sign"), None);
        assert_eq!(normalize_email("a@b"), None);
        assert_eq!(normalize_email("a b@c.de"), None);
        assert_eq!(normalize_email(""), None);
    }

    #[test]
    fn csv_lists_every_subscriber() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let subscribers = vec![
            NewsletterSubscriber {
                id: Uuid::nil(),
                email: "a@b.de".into(),
                locale: "de".into(),
                consent: true,
                consent_at: Some(at),
                verified: true,
                created_at: at,
            },
            NewsletterSubscriber {
                id: Uuid::nil(),
                email: "odd,\"name\"@b.de".into(),
                locale: "tr".into(),
                consent: true,
                consent_at: None,
                verified: false,
                created_at: at,
            },
        ];
        let csv = subscribers_to_csv(&subscribers);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "email,locale,consent_at,verified");
        assert_eq!(lines[1], "a@b.de,de,2025-03-01T09:30:00+00:00,true");
        assert_eq!(lines[2], "\"odd,\"\"name\"\"@b.de\",tr,,false");
    }
}
