use railbook::db;
use railbook::domain::DomainError;
use railbook::models::{
    arrival_point, carriage, carriage_type, city, order, route, route_stop, user,
};
use railbook::services::order_service;
use railbook::services::ticket_service::{self, PurchaseTicketDto};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_user(db: &DatabaseConnection, username: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@test.local", username)),
        password_hash: Set("$argon2id$dummy".to_string()),
        role: Set("user".to_string()),
        is_blocked: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
    .id
}

/// Route with stops A (price 10) and B (price 25) and a two-seat carriage.
struct BookingFixture {
    origin: i32,
    stop_a: i32,
    stop_b: i32,
    carriage_id: i32,
}

async fn setup_booking_fixture(db: &DatabaseConnection) -> BookingFixture {
    let city_id = city::ActiveModel {
        name: Set("Testville".to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id;

    let mut points = Vec::new();
    for place in ["origin", "stop A", "stop B"] {
        let point = arrival_point::ActiveModel {
            city_id: Set(city_id),
            place: Set(place.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        points.push(point.id);
    }

    let route = route::ActiveModel {
        departure_point_id: Set(points[0]),
        departure_time: Set("2030-01-01 09:00:00".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    for (order_index, point, price, time) in [
        (1, points[1], 10.0, "2030-01-01 10:00:00"),
        (2, points[2], 25.0, "2030-01-01 11:00:00"),
    ] {
        route_stop::ActiveModel {
            route_id: Set(route.id),
            arrival_point_id: Set(point),
            stop_order: Set(order_index),
            price: Set(price),
            arrival_time: Set(time.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    let carriage_type = carriage_type::ActiveModel {
        name: Set("seated".to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let carriage = carriage::ActiveModel {
        route_id: Set(route.id),
        carriage_type_id: Set(carriage_type.id),
        seat_amount: Set(2),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    BookingFixture {
        origin: points[0],
        stop_a: points[1],
        stop_b: points[2],
        carriage_id: carriage.id,
    }
}

#[tokio::test]
async fn test_purchase_opens_and_grows_one_pending_order() {
    let db = setup_test_db().await;
    let fx = setup_booking_fixture(&db).await;
    let user_id = create_test_user(&db, "rider").await;

    // First ticket opens a pending order carrying its price
    let first = ticket_service::purchase_ticket(
        &db,
        user_id,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 1,
            departure_point_id: fx.origin,
            arrival_point_id: fx.stop_a,
        },
    )
    .await
    .unwrap();
    assert_eq!(first.price, 10.0);

    let orders = order::Entity::find().all(&db).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "pending");
    assert_eq!(orders[0].total_price, 10.0);
    assert_eq!(first.order_id, Some(orders[0].id));

    // Second ticket lands on the same order and grows the total
    let second = ticket_service::purchase_ticket(
        &db,
        user_id,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 2,
            departure_point_id: fx.stop_a,
            arrival_point_id: fx.stop_b,
        },
    )
    .await
    .unwrap();
    assert_eq!(second.price, 15.0);
    assert_eq!(second.order_id, first.order_id);

    let orders = order::Entity::find().all(&db).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total_price, 25.0);
}

#[tokio::test]
async fn test_duplicate_seat_fails_and_leaves_order_untouched() {
    let db = setup_test_db().await;
    let fx = setup_booking_fixture(&db).await;
    let rider = create_test_user(&db, "rider").await;
    let rival = create_test_user(&db, "rival").await;

    ticket_service::purchase_ticket(
        &db,
        rider,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 1,
            departure_point_id: fx.origin,
            arrival_point_id: fx.stop_a,
        },
    )
    .await
    .unwrap();

    let err = ticket_service::purchase_ticket(
        &db,
        rival,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 1,
            departure_point_id: fx.origin,
            arrival_point_id: fx.stop_b,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, DomainError::SeatTaken);

    // The rival's aborted purchase must not have left an order behind
    let rival_orders = order::Entity::find()
        .filter(order::Column::UserId.eq(rival))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(rival_orders, 0);
}

#[tokio::test]
async fn test_purchase_rejects_bad_segments() {
    let db = setup_test_db().await;
    let fx = setup_booking_fixture(&db).await;
    let user_id = create_test_user(&db, "rider").await;

    // Backwards segment
    let err = ticket_service::purchase_ticket(
        &db,
        user_id,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 1,
            departure_point_id: fx.stop_b,
            arrival_point_id: fx.stop_a,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, DomainError::InvalidOrder);

    // Arrival point from another route
    let stray_point = arrival_point::ActiveModel {
        city_id: Set(1),
        place: Set("stray".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    let err = ticket_service::purchase_ticket(
        &db,
        user_id,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 1,
            departure_point_id: fx.origin,
            arrival_point_id: stray_point.id,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, DomainError::NotFound("arrival point in route"));

    // Nothing committed: no orders, no tickets
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(
        railbook::models::ticket::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_list_orders_by_status() {
    let db = setup_test_db().await;
    let fx = setup_booking_fixture(&db).await;
    let user_id = create_test_user(&db, "rider").await;

    ticket_service::purchase_ticket(
        &db,
        user_id,
        PurchaseTicketDto {
            carriage_id: fx.carriage_id,
            seat_number: 1,
            departure_point_id: fx.origin,
            arrival_point_id: fx.stop_b,
        },
    )
    .await
    .unwrap();

    let pending = order_service::list_orders(&db, user_id, Some("pending".to_string()))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].total_price, 25.0);
    assert_eq!(pending[0].tickets.len(), 1);

    let paid = order_service::list_orders(&db, user_id, Some("success".to_string()))
        .await
        .unwrap();
    assert!(paid.is_empty());

    let err = order_service::list_orders(&db, user_id, Some("bogus".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::validation("status", "no such status"));
}
