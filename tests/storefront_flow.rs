use std::sync::Arc;

use nutthings_storefront::{
    db::run_migrations,
    dto::{
        auth::LoginRequest,
        contact::ContactRequest,
        newsletter::SubscribeRequest,
        orders::{OrderLine, PlaceOrderRequest},
        reviews::CreateTestimonialRequest,
    },
    entity::products::ActiveModel as ProductActive,
    error::AppError,
    i18n::Locale,
    mail::RecordingMailer,
    routes::params::ListingQuery,
    services::{auth_service, catalog_service, contact_service, newsletter_service, order_service, review_service, stats_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Returns None when no database is configured in the environment.
async fn state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run storefront flow tests.");
            return Ok(None);
        }
    };
    let state = AppState::for_tests(&database_url, Arc::new(RecordingMailer::new()))?;
    run_migrations(&state.pool).await?;
    Ok(Some(state))
}

async fn insert_product(state: &AppState, name: &str, price: i64, stock: i32) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    ProductActive {
        id: Set(id),
        name: Set(name.to_string()),
        slug: Set(Some(format!("test-{id}"))),
        description: Set(None),
        price: Set(price),
        image_url: Set(None),
        image_alt: Set(None),
        category_id: Set(None),
        stock: Set(stock),
        sort_order: Set(0),
        is_featured: Set(false),
        likes: Set(0),
        seo_title: Set(None),
        seo_desc: Set(None),
        important_html: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(id)
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let (stock,): (i32,) = sqlx::query_as("SELECT stock FROM products WHERE id = $1")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    Ok(stock)
}

#[tokio::test]
async fn order_decrements_stock_and_conflicts_when_short() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let walnuts = insert_product(&state, "Walnut test", 890, 3).await?;
    let honey = insert_product(&state, "Honey test", 1290, 1).await?;

    // Duplicate lines merge before the stock check.
    let resp = order_service::place_order(
        &state,
        PlaceOrderRequest {
            items: vec![
                OrderLine { product_id: walnuts, quantity: 1 },
                OrderLine { product_id: walnuts, quantity: 1 },
                OrderLine { product_id: honey, quantity: 1 },
            ],
            email: Some("buyer@example.com".into()),
        },
    )
    .await?;
    assert!(resp.ok);
    assert_eq!(stock_of(&state, walnuts).await?, 1);
    assert_eq!(stock_of(&state, honey).await?, 0);

    let (total,): (i64,) = sqlx::query_as("SELECT total_amount FROM orders WHERE id = $1")
        .bind(resp.order_id)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(total, 2 * 890 + 1290);

    // Nothing changes when one line cannot be served.
    let err = order_service::place_order(
        &state,
        PlaceOrderRequest {
            items: vec![
                OrderLine { product_id: walnuts, quantity: 1 },
                OrderLine { product_id: honey, quantity: 1 },
            ],
            email: None,
        },
    )
    .await
    .err();
    assert!(matches!(err, Some(AppError::OutOfStock(id)) if id == honey));
    assert_eq!(stock_of(&state, walnuts).await?, 1);

    let unknown = order_service::place_order(
        &state,
        PlaceOrderRequest {
            items: vec![OrderLine { product_id: Uuid::new_v4(), quantity: 1 }],
            email: None,
        },
    )
    .await
    .err();
    assert!(matches!(unknown, Some(AppError::OutOfStock(_))));
    Ok(())
}

#[tokio::test]
async fn subscribing_twice_keeps_one_row() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let email = format!("Flow.{}@Example.com", Uuid::new_v4().simple());

    for locale in ["en", "xx"] {
        let resp = newsletter_service::subscribe(
            &state,
            SubscribeRequest {
                email: email.clone(),
                locale: Some(locale.into()),
            },
            Some("127.0.0.1".into()),
            None,
        )
        .await?;
        assert!(resp.ok);
    }

    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT email, locale FROM newsletter_subscribers WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_all(&state.pool)
            .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, "de");
    Ok(())
}

#[tokio::test]
async fn submitted_review_shows_up_first() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let name = format!("Reviewer {}", Uuid::new_v4().simple());
    let row = review_service::submit(
        &state,
        CreateTestimonialRequest {
            name: Some(format!("  {name} ")),
            rating: Some(9),
            message: Some("Sehr frisch".into()),
        },
        false,
    )
    .await?;
    assert_eq!(row.name, name);
    assert_eq!(row.rating, Some(5));

    let latest = review_service::latest(&state, 1).await?;
    assert_eq!(latest.first().map(|t| t.id), Some(row.id));

    let page = review_service::review_page(&state, 999).await?;
    let meta = page.meta.expect("page meta");
    assert_eq!(meta.page, meta.total_pages);
    Ok(())
}

#[tokio::test]
async fn likes_never_go_negative_and_drive_sorting() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let plain = insert_product(&state, "Plain test", 100, 5).await?;
    let loved = insert_product(&state, "Loved test", 100, 5).await?;

    let unliked = stats_service::unlike(&state, plain).await?;
    assert_eq!(unliked.data.map(|d| d.likes), Some(0));
    stats_service::like(&state, loved).await?;
    let liked = stats_service::like(&state, loved).await?;
    assert_eq!(liked.data.map(|d| d.likes), Some(2));

    let listing = catalog_service::listing(
        &state,
        Locale::En,
        ListingQuery {
            category_id: None,
            sort: Some("most_liked".into()),
        },
    )
    .await?;
    let items = listing.data.expect("listing data")["items"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let position = |id: Uuid| items.iter().position(|p| p["id"] == id.to_string());
    let (loved_at, plain_at) = (position(loved).expect("loved listed"), position(plain).expect("plain listed"));
    assert!(loved_at < plain_at);

    let missing = stats_service::like(&state, Uuid::new_v4()).await.err();
    assert!(matches!(missing, Some(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn liking_drops_cached_listings() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let product = insert_product(&state, "Cached test", 100, 5).await?;
    let query = || ListingQuery {
        category_id: None,
        sort: Some("most_liked".into()),
    };
    catalog_service::listing(&state, Locale::De, query()).await?;
    catalog_service::categories(&state).await?;
    assert_eq!(state.cache.entry_count().await, 2);

    stats_service::like(&state, product).await?;
    // only the category list survives
    assert_eq!(state.cache.entry_count().await, 1);

    let listing = catalog_service::listing(&state, Locale::De, query()).await?;
    let items = listing.data.expect("listing data")["items"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert!(items.iter().any(|p| p["id"] == product.to_string()));
    Ok(())
}

#[tokio::test]
async fn short_link_needs_a_slug() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let product = insert_product(&state, "Linked test", 100, 5).await?;
    let path = catalog_service::product_path(&state, product).await?;
    assert_eq!(path, format!("/products/test-{product}"));

    sqlx::query("UPDATE products SET slug = NULL WHERE id = $1")
        .bind(product)
        .execute(&state.pool)
        .await?;
    let missing = catalog_service::product_path(&state, product).await.err();
    assert!(matches!(missing, Some(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn unknown_login_is_unauthorized() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: format!("nobody-{}@example.com", Uuid::new_v4().simple()),
            password: "whatever".into(),
        },
    )
    .await
    .err();
    assert!(matches!(err, Some(AppError::Unauthorized)));
    Ok(())
}

#[tokio::test]
async fn contact_message_is_stored_and_listed() -> anyhow::Result<()> {
    let Some(state) = state().await? else {
        return Ok(());
    };
    let email = format!("Contact-{}@Example.com", Uuid::new_v4().simple());
    let resp = contact_service::submit(
        &state,
        ContactRequest {
            name: Some(" Ayşe ".into()),
            email: Some(email.clone()),
            phone: Some("  ".into()),
            message: Some("Gibt es Walnüsse in 1 kg?".into()),
        },
    )
    .await?;
    assert!(resp.ok);

    let (stored_email, phone): (String, Option<String>) =
        sqlx::query_as("SELECT email, phone FROM contact_messages WHERE id = $1")
            .bind(resp.id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(stored_email, email.to_lowercase());
    assert_eq!(phone, None);

    let listed = contact_service::list_messages(&state, Default::default()).await?;
    let items = listed.data.map(|d| d.items).unwrap_or_default();
    assert!(items.iter().any(|m| m.id == resp.id && m.name == "Ayşe"));
    Ok(())
}
