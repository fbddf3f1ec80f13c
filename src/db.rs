use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

use crate::payments::PaymentProvider;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { db, payments }
    }
}

// Allow handlers that only touch the database to extract it directly
impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create users table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            is_blocked INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create cities table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS cities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create arrival_points table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS arrival_points (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_id INTEGER NOT NULL,
            place TEXT NOT NULL,
            FOREIGN KEY (city_id) REFERENCES cities(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_arrival_points_city_id ON arrival_points(city_id);
        "#
        .to_owned(),
    ))
    .await?;

    // Create routes table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS routes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            departure_point_id INTEGER NOT NULL,
            departure_time TEXT NOT NULL,
            FOREIGN KEY (departure_point_id) REFERENCES arrival_points(id)
        );
        CREATE INDEX IF NOT EXISTS idx_routes_departure_point_id ON routes(departure_point_id);
        "#
        .to_owned(),
    ))
    .await?;

    // Create route_stops table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS route_stops (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            route_id INTEGER NOT NULL,
            arrival_point_id INTEGER NOT NULL,
            stop_order INTEGER NOT NULL,
            price REAL NOT NULL,
            arrival_time TEXT NOT NULL,
            UNIQUE(route_id, stop_order),
            FOREIGN KEY (route_id) REFERENCES routes(id) ON DELETE CASCADE,
            FOREIGN KEY (arrival_point_id) REFERENCES arrival_points(id)
        );
        CREATE INDEX IF NOT EXISTS idx_route_stops_route_id ON route_stops(route_id);
        CREATE INDEX IF NOT EXISTS idx_route_stops_arrival_point_id ON route_stops(arrival_point_id);
        "#
        .to_owned(),
    ))
    .await?;

    // Create carriage_types table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS carriage_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create carriages table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS carriages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            route_id INTEGER NOT NULL,
            carriage_type_id INTEGER NOT NULL,
            seat_amount INTEGER NOT NULL,
            FOREIGN KEY (route_id) REFERENCES routes(id) ON DELETE CASCADE,
            FOREIGN KEY (carriage_type_id) REFERENCES carriage_types(id)
        );
        CREATE INDEX IF NOT EXISTS idx_carriages_route_id ON carriages(route_id);
        "#
        .to_owned(),
    ))
    .await?;

    // Create orders table. The partial unique index keeps concurrent
    // purchases from racing a second 'pending' order into existence.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            total_price REAL NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id);
        CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_orders_user_pending
            ON orders(user_id) WHERE status = 'pending';
        "#
        .to_owned(),
    ))
    .await?;

    // Create tickets table. UNIQUE(carriage_id, seat_number) is the
    // authoritative seat reservation guard.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            carriage_id INTEGER NOT NULL,
            seat_number INTEGER NOT NULL,
            departure_point_id INTEGER NOT NULL,
            arrival_point_id INTEGER NOT NULL,
            price REAL NOT NULL,
            order_id INTEGER,
            created_at TEXT NOT NULL,
            UNIQUE(carriage_id, seat_number),
            FOREIGN KEY (carriage_id) REFERENCES carriages(id) ON DELETE CASCADE,
            FOREIGN KEY (departure_point_id) REFERENCES arrival_points(id),
            FOREIGN KEY (arrival_point_id) REFERENCES arrival_points(id),
            FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tickets_carriage_id ON tickets(carriage_id);
        CREATE INDEX IF NOT EXISTS idx_tickets_order_id ON tickets(order_id);
        "#
        .to_owned(),
    ))
    .await?;

    // Create discount_types table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS discount_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            discount_percent REAL NOT NULL,
            discount_limit INTEGER
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create discounts table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS discounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            discount_type_id INTEGER NOT NULL,
            usage_amount INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (discount_type_id) REFERENCES discount_types(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_discounts_user_id ON discounts(user_id);
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}
