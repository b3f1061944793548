use nutthings_storefront::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::{admin_service::slugify, auth_service::hash_password},
    settings::SiteSettings,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let admin_id = ensure_admin(&pool, "admin@nut-things.com", "admin123").await?;
    seed_catalog(&pool).await?;
    seed_settings(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Nüsse", "Geröstet und naturbelassen"),
        ("Lokum", "Türkischer Honig in vielen Sorten"),
        ("Trockenfrüchte", "Sonnengetrocknet"),
    ];

    for (position, (name, tagline)) in categories.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, tagline, position)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(slugify(name))
        .bind(*tagline)
        .bind(position as i32)
        .execute(pool)
        .await?;
    }

    // (name, category, price in cents, stock, featured)
    let products = [
        ("Walnusskerne", "Nüsse", 890, 40, true),
        ("Cashew geröstet", "Nüsse", 1090, 25, false),
        ("Pistazien Antep", "Nüsse", 1690, 4, true),
        ("Lokum Rose", "Lokum", 690, 60, true),
        ("Lokum Granatapfel", "Lokum", 790, 0, false),
        ("Aprikosen", "Trockenfrüchte", 590, 80, false),
    ];

    for (sort_order, (name, category, price, stock, featured)) in products.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, price, stock, is_featured, sort_order, category_id)
            SELECT $1, $2, $3, $4, $5, $6, $7, c.id FROM categories c WHERE c.slug = $8
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(slugify(name))
        .bind(i64::from(*price))
        .bind(*stock)
        .bind(*featured)
        .bind(sort_order as i32)
        .bind(slugify(category))
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO product_stats (product_id, likes, clicks)
        SELECT id, 0, 0 FROM products
        ON CONFLICT (product_id) DO NOTHING
        "#,
    )
    .execute(pool)
    .await?;

    println!("Seeded categories and products");
    Ok(())
}

/// Writes the default value of every settings key that is not stored yet.
async fn seed_settings(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for (key, value) in SiteSettings::default().to_rows() {
        sqlx::query("INSERT INTO settings (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }
    println!("Seeded settings");
    Ok(())
}
