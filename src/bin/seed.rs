use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use canteen_ops_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let owner_id = ensure_user(&pool, "Asha Rao", "owner@example.com", "owner123", "owner").await?;
    let staff_id = ensure_user(&pool, "Dev Nair", "staff@example.com", "staff123", "staff").await?;
    let canteen_id = ensure_canteen(&pool, "Campus Central", "Block A, Ground Floor").await?;
    ensure_member(&pool, canteen_id, owner_id, "owner").await?;
    ensure_member(&pool, canteen_id, staff_id, "staff").await?;
    seed_menu_items(&pool, canteen_id).await?;
    seed_inventory(&pool, canteen_id).await?;

    println!("Seed completed. Owner ID: {owner_id}, Canteen ID: {canteen_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(row.0)
}

async fn ensure_canteen(pool: &sqlx::PgPool, name: &str, location: &str) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO canteens (id, name, location)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE SET location = EXCLUDED.location
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(location)
    .fetch_one(pool)
    .await?;

    println!("Ensured canteen {name}");
    Ok(row.0)
}

async fn ensure_member(
    pool: &sqlx::PgPool,
    canteen_id: Uuid,
    user_id: Uuid,
    member_role: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO canteen_members (id, canteen_id, user_id, member_role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (canteen_id, user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(canteen_id)
    .bind(user_id)
    .bind(member_role)
    .execute(pool)
    .await?;
    Ok(())
}

async fn seed_menu_items(pool: &sqlx::PgPool, canteen_id: Uuid) -> anyhow::Result<()> {
    let items: [(&str, &str, &str, i64, bool); 4] = [
        ("Masala Dosa", "monday", "breakfast", 6000, true),
        ("Veg Thali", "monday", "lunch", 12000, true),
        ("Samosa", "monday", "snacks", 2000, true),
        ("Filter Coffee", "monday", "beverages", 2500, true),
    ];

    for (name, day, category, price, is_vegetarian) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, canteen_id, name, day, category, price, is_vegetarian)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE NOT EXISTS (
                SELECT 1 FROM menu_items WHERE canteen_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(canteen_id)
        .bind(name)
        .bind(day)
        .bind(category)
        .bind(price)
        .bind(is_vegetarian)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu items");
    Ok(())
}

async fn seed_inventory(pool: &sqlx::PgPool, canteen_id: Uuid) -> anyhow::Result<()> {
    let items: [(&str, &str, &str, i32, i32, i64); 3] = [
        ("Rice", "grains", "kg", 50, 10, 5500),
        ("Toor Dal", "pulses", "kg", 20, 5, 11000),
        ("Milk", "dairy", "l", 30, 12, 6000),
    ];

    for (name, category, unit, current_stock, reorder_point, unit_price) in items {
        sqlx::query(
            r#"
            INSERT INTO inventory_items
                (id, canteen_id, name, category, unit, current_stock, reorder_point, unit_price)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (
                SELECT 1 FROM inventory_items WHERE canteen_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(canteen_id)
        .bind(name)
        .bind(category)
        .bind(unit)
        .bind(current_stock)
        .bind(reorder_point)
        .bind(unit_price)
        .execute(pool)
        .await?;
    }

    println!("Seeded inventory");
    Ok(())
}
