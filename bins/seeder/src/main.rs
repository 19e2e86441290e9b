//! Database seeder for Tienda development and testing.
//!
//! Seeds a test customer with a debt, a small product catalog, and one
//! pending order so the sale and earnings flows can be exercised locally.
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tienda_db::entities::{
    customers, debt_movements, debts, order_items, orders, products,
    sea_orm_active_enums::{MovementType, OrderStatus},
};
use tienda_shared::{AppConfig, StoreClock};

/// Test customer ID (consistent for all seeds)
const TEST_CUSTOMER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test debt ID (consistent for all seeds)
const TEST_DEBT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test order ID (consistent for all seeds)
const TEST_ORDER_ID: &str = "00000000-0000-0000-0000-000000000003";

/// Seed products: (id, name, purchase price, sale price, stock, unit)
const PRODUCTS: &[(&str, &str, Decimal, Decimal, Decimal, &str)] = &[
    (
        "00000000-0000-0000-0000-000000000101",
        "Arroz 500g",
        dec!(1800),
        dec!(2500),
        dec!(40),
        "und",
    ),
    (
        "00000000-0000-0000-0000-000000000102",
        "Panela",
        dec!(2200),
        dec!(3000),
        dec!(25),
        "und",
    ),
    (
        "00000000-0000-0000-0000-000000000103",
        "Queso campesino",
        dec!(9000),
        dec!(12000),
        dec!(6.5),
        "kg",
    ),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().ok();

    // RUST_LOG wins; otherwise the configured filter. Repository warnings
    // (balance clamps, stock floors) surface through this subscriber.
    let fallback_filter = config
        .as_ref()
        .map_or_else(|| "tienda=info".to_string(), |c| c.logging.filter.clone());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // DATABASE_URL wins; otherwise fall back to the config files.
    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| config.map(|c| c.database.url))
        .expect("DATABASE_URL must be set or config/default.toml provided");

    println!("Connecting to database...");
    let db = tienda_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test customer...");
    seed_test_customer(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding debt with movements...");
    seed_debt(&db).await;

    println!("Seeding pending order...");
    seed_order(&db).await;

    println!("Seeding complete!");
}

fn test_customer_id() -> Uuid {
    Uuid::parse_str(TEST_CUSTOMER_ID).unwrap()
}

async fn seed_test_customer(db: &DatabaseConnection) {
    let existing = customers::Entity::find_by_id(test_customer_id())
        .one(db)
        .await
        .expect("Failed to query customers");
    if existing.is_some() {
        println!("  Test customer already exists, skipping");
        return;
    }

    customers::ActiveModel {
        id: Set(test_customer_id()),
        name: Set("Cliente de Prueba".to_string()),
        created_at: Set(StoreClock::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test customer");
}

async fn seed_products(db: &DatabaseConnection) {
    for (id, name, purchase, sale, stock, unit) in PRODUCTS {
        let product_id = Uuid::parse_str(id).unwrap();
        let existing = products::Entity::find_by_id(product_id)
            .one(db)
            .await
            .expect("Failed to query products");
        if existing.is_some() {
            println!("  Product '{name}' already exists, skipping");
            continue;
        }

        products::ActiveModel {
            id: Set(product_id),
            name: Set((*name).to_string()),
            state: Set(true),
            purchase_price: Set(*purchase),
            sale_price: Set(*sale),
            stock: Set(*stock),
            unit: Set((*unit).to_string()),
        }
        .insert(db)
        .await
        .expect("Failed to insert product");
    }
}

async fn seed_debt(db: &DatabaseConnection) {
    let debt_id = Uuid::parse_str(TEST_DEBT_ID).unwrap();
    let existing = debts::Entity::find_by_id(debt_id)
        .one(db)
        .await
        .expect("Failed to query debts");
    if existing.is_some() {
        println!("  Test debt already exists, skipping");
        return;
    }

    let now = StoreClock::now();
    debts::ActiveModel {
        id: Set(debt_id),
        customer_id: Set(test_customer_id()),
        current_balance: Set(dec!(15000)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert debt");

    // Matching movement log: 20000 owed, 5000 paid back.
    debt_movements::ActiveModel {
        id: Set(Uuid::now_v7()),
        debt_id: Set(debt_id),
        movement_type: Set(MovementType::NewBalance),
        amount: Set(dec!(20000)),
        description: Set(Some("Fiado inicial".to_string())),
        notes: Set(None),
        movement_date: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert movement");

    debt_movements::ActiveModel {
        id: Set(Uuid::now_v7()),
        debt_id: Set(debt_id),
        movement_type: Set(MovementType::Payment),
        amount: Set(dec!(5000)),
        description: Set(Some("Abono".to_string())),
        notes: Set(None),
        movement_date: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert movement");
}

async fn seed_order(db: &DatabaseConnection) {
    let order_id = Uuid::parse_str(TEST_ORDER_ID).unwrap();
    let existing = orders::Entity::find_by_id(order_id)
        .one(db)
        .await
        .expect("Failed to query orders");
    if existing.is_some() {
        println!("  Test order already exists, skipping");
        return;
    }

    orders::ActiveModel {
        id: Set(order_id),
        customer_id: Set(test_customer_id()),
        date: Set(StoreClock::now()),
        status: Set(OrderStatus::Pending),
    }
    .insert(db)
    .await
    .expect("Failed to insert order");

    let (product_id, _, _, sale_price, ..) = PRODUCTS[0];
    let quantity = dec!(2);
    order_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        order_id: Set(order_id),
        product_id: Set(Uuid::parse_str(product_id).unwrap()),
        quantity: Set(quantity),
        price_unit: Set(sale_price),
        subtotal: Set(sale_price * quantity),
    }
    .insert(db)
    .await
    .expect("Failed to insert order item");
}
